use std::sync::mpsc;

use objc2::{
    rc::{autoreleasepool, Retained},
    runtime::AnyObject,
    MainThreadMarker, MainThreadOnly,
};
use objc2_app_kit::{NSSharingServicePicker, NSView};
use objc2_core_foundation::{CGPoint, CGRect, CGSize};
use objc2_foundation::{NSArray, NSRectEdge, NSString, NSURL};
use raw_window_handle::{HasWindowHandle, RawWindowHandle};
use tauri::{Runtime, Window};

use crate::request::SheetRequest;
use crate::{Error, Result};

pub const HAS_SHARE_SHEET: bool = true;

/// Shows an `NSSharingServicePicker` anchored to the middle of the window.
pub fn present<R: Runtime>(window: &Window<R>, request: &SheetRequest) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    let target = window.clone();
    let request = request.clone();

    window.run_on_main_thread(move || {
        let result = (|| -> Result<()> {
            let mtm = MainThreadMarker::new()
                .ok_or_else(|| Error::NativeApi("Not on the main thread.".to_string()))?;
            let ns_view = get_ns_view(&target)?;

            let mut items: Vec<Retained<AnyObject>> = Vec::new();
            let text = request.combined_text();
            if !text.is_empty() {
                let text = NSString::from_str(&text);
                items.push(Retained::into_super(Retained::into_super(text)));
            }
            for file in &request.files {
                let path = NSString::from_str(&file.path.to_string_lossy());
                let url = unsafe { NSURL::fileURLWithPath(&path) };
                items.push(Retained::into_super(Retained::into_super(url)));
            }
            if items.is_empty() {
                return Err(Error::MissingContent);
            }

            autoreleasepool(|_pool| {
                let items = NSArray::from_retained_slice(&items);
                let picker = unsafe {
                    NSSharingServicePicker::initWithItems(NSSharingServicePicker::alloc(mtm), &items)
                };
                let bounds = ns_view.bounds();
                unsafe {
                    picker.showRelativeToRect_ofView_preferredEdge(
                        CGRect {
                            origin: CGPoint {
                                x: bounds.size.width / 2.0,
                                y: bounds.size.height / 2.0,
                            },
                            size: CGSize {
                                width: 0.0,
                                height: 0.0,
                            },
                        },
                        &ns_view,
                        NSRectEdge::NSMinYEdge,
                    );
                }
            });
            Ok(())
        })();
        tx.send(result).ok();
    })?;

    rx.recv()
        .map_err(|_| Error::NativeApi("Failed to receive result from main thread".to_string()))?
}

/// Retrieves the `NSView` behind the Tauri window.
fn get_ns_view<R: Runtime>(window: &Window<R>) -> Result<Retained<NSView>> {
    let handle = window
        .window_handle()
        .map_err(|e| Error::NativeApi(e.to_string()))?;
    match handle.as_raw() {
        RawWindowHandle::AppKit(handle) => {
            let ns_view = handle.ns_view.as_ptr();
            unsafe { Retained::retain(ns_view.cast::<NSView>()) }
                .ok_or_else(|| Error::NativeApi("Window has no NSView.".to_string()))
        }
        _ => Err(Error::NativeApi(
            "Unsupported window handle type on macOS.".to_string(),
        )),
    }
}
