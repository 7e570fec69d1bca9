use tracing::{debug, info};

use crate::error::FullscreenError;

use super::{
    address::Address,
    page::{self, PageSizeControl, PageState},
    video::VideoCollection,
    view::{self, Frame, View},
};

/// Smallest terminal that can hold a frame in full-viewport mode.
pub const MIN_FULLSCREEN_WIDTH: u16 = 20;
pub const MIN_FULLSCREEN_HEIGHT: u16 = 5;

/// Settings a wall starts out with.
#[derive(Debug, Clone)]
pub struct WallConfig {
    pub address: Address,
    pub camera: usize,
    pub camera_options: Vec<usize>,
    pub json_url: Option<String>,
    pub file: Option<String>,
    pub fullscreen_enabled: bool,
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            address: Address::default(),
            camera: 4,
            camera_options: vec![1, 2, 4, 6, 9, 12, 16],
            json_url: None,
            file: None,
            fullscreen_enabled: true,
        }
    }
}

/// Application state of the video wall.
///
/// The collection is only replaced by loads, the page and controls only by
/// user actions. Every change that affects the visible page goes through `render`.
#[derive(Debug)]
pub struct Wall {
    collection: VideoCollection,
    page: PageState,
    camera: PageSizeControl,
    address: Address,
    json_url: String,
    file: String,
    view: View,
    focus: Option<usize>,
    fullscreen: Option<usize>,
    fullscreen_enabled: bool,
    applied_load: u64,
}

impl Wall {
    pub fn new(config: WallConfig) -> Self {
        Self {
            collection: VideoCollection::default(),
            page: PageState::default(),
            camera: PageSizeControl::new(config.camera, config.camera_options),
            address: config.address,
            json_url: config.json_url.unwrap_or_default(),
            file: config.file.unwrap_or_default(),
            view: View::default(),
            focus: None,
            fullscreen: None,
            fullscreen_enabled: config.fullscreen_enabled,
            applied_load: 0,
        }
    }

    /// Seeds page and camera count from the address. Invalid values keep the defaults.
    pub fn restore_from_address(&mut self) {
        if let Some(page) = self.address.page() {
            self.page = PageState::new(page);
        }
        if let Some(camera) = self.address.camera() {
            self.camera.set_value(camera.to_string());
        }
        debug!(
            page = self.page.current(),
            camera = self.camera.value(),
            "Restored view from '{}'",
            self.address
        );
    }

    /// Rebuilds the visible page and writes it into the address.
    pub fn render(&mut self) {
        self.view = view::render(&self.collection, &self.camera, self.page);
        self.address.push(self.page.current(), self.view.page_size);

        // Frames are rebuilt from scratch, nothing refers to the old ones.
        self.focus = None;
        self.fullscreen = None;

        debug!(
            frames = self.view.frames.len(),
            status = %self.view.status,
            "Rendered '{}'",
            self.address
        );
    }

    pub fn total_pages(&self) -> usize {
        page::total_pages(self.collection.len(), self.camera.page_size())
    }

    pub fn change_page_size(&mut self, change: impl FnOnce(&mut PageSizeControl) -> bool) {
        if change(&mut self.camera) {
            self.page.reset();
            self.render();
        }
    }

    pub fn previous_page(&mut self) -> bool {
        let changed = self.page.previous();
        if changed {
            self.render();
        }
        changed
    }

    pub fn next_page(&mut self) -> bool {
        let changed = self.page.next(self.total_pages());
        if changed {
            self.render();
        }
        changed
    }

    /// Replaces the collection with the result of load number `ticket`.
    ///
    /// Results of loads older than the last applied one are dropped.
    /// The current page is kept as is, even when it is now out of range.
    pub fn apply_load(&mut self, ticket: u64, collection: VideoCollection) -> bool {
        if ticket <= self.applied_load {
            info!(
                ticket,
                applied = self.applied_load,
                "Dropping stale video list"
            );
            return false;
        }

        self.applied_load = ticket;
        self.collection = collection;
        self.render();

        true
    }

    /// Presents the visible frame at `position` across the whole viewport.
    pub fn request_fullscreen(
        &mut self,
        position: usize,
        (width, height): (u16, u16),
    ) -> Result<(), FullscreenError> {
        if !self.fullscreen_enabled {
            return Err(FullscreenError::Unsupported);
        }
        if position >= self.view.frames.len() {
            return Err(FullscreenError::NoSuchFrame(position));
        }
        if width < MIN_FULLSCREEN_WIDTH || height < MIN_FULLSCREEN_HEIGHT {
            return Err(FullscreenError::ViewportTooSmall { width, height });
        }

        self.fullscreen = Some(position);
        self.focus = Some(position);

        Ok(())
    }

    pub fn exit_fullscreen(&mut self) -> bool {
        self.fullscreen.take().is_some()
    }

    /// Position of the frame presented across the whole viewport, if any.
    pub fn fullscreen(&self) -> Option<usize> {
        self.fullscreen
    }

    pub fn fullscreen_frame(&self) -> Option<&Frame> {
        self.fullscreen
            .and_then(|position| self.view.frames.get(position))
    }

    pub fn focus_next(&mut self) {
        let frames = self.view.frames.len();
        if frames > 0 {
            self.focus = Some(self.focus.map_or(0, |focus| (focus + 1) % frames));
        }
    }

    pub fn focus_previous(&mut self) {
        let frames = self.view.frames.len();
        if frames > 0 {
            self.focus = Some(
                self.focus
                    .map_or(frames - 1, |focus| (focus + frames - 1) % frames),
            );
        }
    }

    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    pub fn collection(&self) -> &VideoCollection {
        &self.collection
    }

    pub fn page(&self) -> PageState {
        self.page
    }

    pub fn camera(&self) -> &PageSizeControl {
        &self.camera
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn json_url(&self) -> &str {
        &self.json_url
    }

    pub fn json_url_mut(&mut self) -> &mut String {
        &mut self.json_url
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn file_mut(&mut self) -> &mut String {
        &mut self.file
    }
}
