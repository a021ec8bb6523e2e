//! Surface manager for preview windows
//!
//! Each surface is a top-level winit window hosting a wry WebView. The
//! manager owns both and maps winit window ids back to surface ids.

use std::collections::HashMap;
use std::path::Path;
use std::sync::mpsc::Sender;

use serde_json::Value;
use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Icon, Window, WindowId};
use wry::{WebView, WebViewBuilder};

use dotview::commands::SurfaceOptions;
use dotview::messages::Msg;
use dotview::model::{DisplayTarget, SurfaceId};

use super::resources::{self, SCHEME};

struct Surface {
    // declared before the window so it is dropped first
    webview: WebView,
    window: Window,
}

/// Manages windows and webviews for preview surfaces
pub struct SurfaceManager {
    surfaces: HashMap<SurfaceId, Surface>,
    windows: HashMap<WindowId, SurfaceId>,
}

impl SurfaceManager {
    pub fn new() -> Self {
        Self {
            surfaces: HashMap::new(),
            windows: HashMap::new(),
        }
    }

    /// Create the window and webview for a surface
    ///
    /// Messages posted by the page arrive on `msg_tx` as `SurfaceMsg::Message`.
    pub fn create(
        &mut self,
        event_loop: &ActiveEventLoop,
        surface: SurfaceId,
        title: &str,
        options: &SurfaceOptions,
        msg_tx: Sender<Msg>,
    ) -> Result<(), String> {
        // Don't create duplicate
        if self.surfaces.contains_key(&surface) {
            return Ok(());
        }

        let attributes = Window::default_attributes()
            .with_title(title)
            .with_inner_size(LogicalSize::new(900, 700))
            .with_window_icon(options.icon.as_deref().and_then(load_icon));
        let window = event_loop
            .create_window(attributes)
            .map_err(|e| e.to_string())?;

        if !options.enable_scripts {
            tracing::warn!("{}: scripts cannot be disabled for webview surfaces", surface);
        }
        tracing::debug!(
            "{}: retain_context_when_hidden={}, find_widget={}",
            surface,
            options.retain_context_when_hidden,
            options.enable_find_widget
        );

        let roots = options.local_resource_roots.clone();
        let webview = WebViewBuilder::new()
            .with_devtools(cfg!(debug_assertions))
            .with_custom_protocol(SCHEME.to_string(), move |_id, request| {
                resources::serve(&roots, &request)
            })
            .with_ipc_handler(move |request| {
                match serde_json::from_str::<Value>(request.body()) {
                    Ok(raw) => super::app::post(&msg_tx, Msg::surface_message(surface, raw)),
                    Err(e) => tracing::warn!("{}: ignoring non-JSON message: {}", surface, e),
                }
            })
            .with_navigation_handler(|url| {
                // Open external links in the default browser
                if url.starts_with("http://") || url.starts_with("https://") {
                    if let Err(e) = open::that(&url) {
                        tracing::debug!("Failed to open {}: {}", url, e);
                    }
                    false
                } else {
                    true
                }
            })
            .build(&window)
            .map_err(|e| e.to_string())?;

        self.windows.insert(window.id(), surface);
        self.surfaces.insert(surface, Surface { webview, window });
        Ok(())
    }

    /// Bring a surface to the foreground
    pub fn reveal(&self, surface: SurfaceId, target: DisplayTarget) {
        if let Some(s) = self.surfaces.get(&surface) {
            if target != DisplayTarget::Active {
                tracing::debug!("{}: display target {:?} maps to focus", surface, target);
            }
            s.window.set_visible(true);
            s.window.set_minimized(false);
            s.window.focus_window();
        }
    }

    /// Replace the surface content
    pub fn set_content(&self, surface: SurfaceId, html: &str) {
        if let Some(s) = self.surfaces.get(&surface) {
            if let Err(e) = s.webview.load_html(html) {
                tracing::error!("{}: failed to load content: {}", surface, e);
            }
        }
    }

    /// Deliver a message to the page as a `message` event
    pub fn post_message(&self, surface: SurfaceId, payload: &Value) {
        if let Some(s) = self.surfaces.get(&surface) {
            let js = format!("window.postMessage({}, '*');", payload);
            if let Err(e) = s.webview.evaluate_script(&js) {
                tracing::warn!("{}: failed to post message: {}", surface, e);
            }
        }
    }

    /// Close and remove a surface. Returns false if it was already gone.
    pub fn close(&mut self, surface: SurfaceId) -> bool {
        match self.surfaces.remove(&surface) {
            Some(s) => {
                self.windows.remove(&s.window.id());
                true
            }
            None => false,
        }
    }

    pub fn surface_for_window(&self, window: WindowId) -> Option<SurfaceId> {
        self.windows.get(&window).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

impl Default for SurfaceManager {
    fn default() -> Self {
        Self::new()
    }
}

fn load_icon(path: &Path) -> Option<Icon> {
    let image = match image::open(path) {
        Ok(image) => image.into_rgba8(),
        Err(e) => {
            tracing::debug!("No window icon at {}: {}", path.display(), e);
            return None;
        }
    };
    let (width, height) = image.dimensions();
    Icon::from_rgba(image.into_raw(), width, height).ok()
}
