use std::cell::RefCell;
use std::sync::{mpsc, Arc};

use raw_window_handle::{HasWindowHandle, RawWindowHandle};
use tauri::{Runtime, Window};
use windows::ApplicationModel::DataTransfer::{DataRequestedEventArgs, DataTransferManager};
use windows::Storage::IStorageItem;
use windows::{
    core::{Interface, HSTRING},
    Foundation::TypedEventHandler,
    Storage::StorageFile,
    Win32::{
        Foundation::HWND,
        System::WinRT::{RoInitialize, RO_INIT_SINGLETHREADED},
        UI::Shell::IDataTransferManagerInterop,
    },
};
use windows_collections::IIterable;

use crate::request::SheetRequest;
use crate::{Error, Result};

pub const HAS_SHARE_SHEET: bool = true;

// Keeps the DataTransferManager and its DataRequested registration alive
// until the share UI asks for data. These WinRT objects are not Send, so
// they live on the main thread only.
thread_local! {
    static SHARE_STATE: RefCell<Option<(DataTransferManager, i64)>> = const { RefCell::new(None) };
}

impl From<windows::core::Error> for Error {
    fn from(err: windows::core::Error) -> Self {
        Error::NativeApi(err.message().to_string())
    }
}

pub fn present<R: Runtime>(window: &Window<R>, request: &SheetRequest) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    let target = window.clone();
    let request = Arc::new(request.clone());

    window.run_on_main_thread(move || {
        let result = (|| -> Result<()> {
            initialize_winrt_thread()?;
            let hwnd = get_hwnd(&target)?;
            let (dtm, interop) = get_data_transfer_manager(hwnd)?;

            let handler = TypedEventHandler::new({
                let request = request.clone();
                move |_, args: windows::core::Ref<'_, DataRequestedEventArgs>| -> windows::core::Result<()> {
                    if let Some(args) = (*args).as_ref() {
                        fill_data_request(args, &request)?;
                    }
                    SHARE_STATE.with(|state| {
                        if let Some((manager, token)) = state.borrow_mut().take() {
                            let _ = manager.RemoveDataRequested(token);
                        }
                    });
                    Ok(())
                }
            });

            let token = dtm.DataRequested(&handler)?;
            SHARE_STATE.with(|state| {
                *state.borrow_mut() = Some((dtm, token));
            });

            unsafe { interop.ShowShareUIForWindow(hwnd) }?;
            Ok(())
        })();
        tx.send(result).ok();
    })?;

    rx.recv()
        .map_err(|_| Error::NativeApi("Failed to receive result from main thread".to_string()))?
}

fn fill_data_request(
    args: &DataRequestedEventArgs,
    request: &Arc<SheetRequest>,
) -> windows::core::Result<()> {
    let data_request = args.Request()?;
    let data = data_request.Data()?;

    // The share UI refuses packages without a title.
    let title = request.title.clone().unwrap_or_else(|| "Share".to_string());
    data.Properties()?.SetTitle(&HSTRING::from(title))?;

    let text = request.combined_text();
    if !text.is_empty() {
        data.SetText(&HSTRING::from(text))?;
    }

    if request.files.is_empty() {
        return Ok(());
    }

    let deferral = data_request.GetDeferral()?;
    let request = request.clone();
    tauri::async_runtime::spawn(async move {
        let mut items: Vec<Option<IStorageItem>> = Vec::new();
        for file in &request.files {
            let path = HSTRING::from(file.path.to_string_lossy().as_ref());
            match StorageFile::GetFileFromPathAsync(&path).and_then(|op| op.get()) {
                Ok(storage_file) => match storage_file.cast::<IStorageItem>() {
                    Ok(item) => items.push(Some(item)),
                    Err(e) => log::warn!("{} is not a storage item: {}", file.path.display(), e),
                },
                Err(e) => log::warn!("failed to open {} for sharing: {}", file.path.display(), e),
            }
        }

        if !items.is_empty() {
            let iterable: std::result::Result<IIterable<IStorageItem>, _> = items.try_into();
            match iterable {
                Ok(items) => {
                    if let Err(e) = data.SetStorageItemsReadOnly(&items) {
                        log::warn!("failed to attach files to the share: {}", e);
                    }
                }
                Err(e) => log::warn!("failed to collect files for the share: {:?}", e),
            }
        }
        if let Err(e) = deferral.Complete() {
            log::warn!("failed to complete share deferral: {}", e);
        }
    });
    Ok(())
}

/// RoInitialize returns S_FALSE when the thread is already initialized,
/// which is not an error.
fn initialize_winrt_thread() -> Result<()> {
    unsafe { RoInitialize(RO_INIT_SINGLETHREADED) }
        .map_err(|e| Error::NativeApi(format!("Failed to initialize WinRT: {}", e)))
}

fn get_hwnd<R: Runtime>(window: &Window<R>) -> Result<HWND> {
    let handle = window
        .window_handle()
        .map_err(|e| Error::NativeApi(e.to_string()))?;

    match handle.as_raw() {
        RawWindowHandle::Win32(handle) => Ok(HWND(handle.hwnd.get() as *mut std::ffi::c_void)),
        _ => Err(Error::NativeApi("Unsupported window handle type".to_string())),
    }
}

/// Desktop (non-UWP) apps must get the manager through the interop interface.
fn get_data_transfer_manager(
    hwnd: HWND,
) -> Result<(DataTransferManager, IDataTransferManagerInterop)> {
    let interop = windows::core::factory::<DataTransferManager, IDataTransferManagerInterop>()?;
    let dtm = unsafe { interop.GetForWindow(hwnd) }?;
    Ok((dtm, interop))
}
