use super::{
    page::{self, PageSizeControl, PageState},
    video::{VideoCollection, VideoRecord},
};

/// One visible video on the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Position in the full collection.
    pub index: usize,
    pub record: VideoRecord,
}

impl Frame {
    pub fn url(&self) -> &str {
        self.record.url()
    }

    pub fn title(&self) -> &str {
        self.record.title()
    }
}

/// Everything the UI draws for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub frames: Vec<Frame>,
    pub page_size: usize,
    pub total_pages: usize,
    pub prev_disabled: bool,
    pub next_disabled: bool,
    pub status: String,
}

impl Default for View {
    fn default() -> Self {
        Self {
            frames: Vec::new(),
            page_size: 1,
            total_pages: 0,
            prev_disabled: true,
            next_disabled: true,
            status: String::new(),
        }
    }
}

/// Computes the page shown for `page` of `collection`.
pub fn render(collection: &VideoCollection, control: &PageSizeControl, page: PageState) -> View {
    let page_size = control.page_size();
    let total_videos = collection.len();
    let total_pages = page::total_pages(total_videos, page_size);
    let range = page::page_range(page.current(), page_size, total_videos);

    let frames = collection
        .slice(range.clone())
        .iter()
        .zip(range)
        .map(|(record, index)| Frame {
            index,
            record: record.clone(),
        })
        .collect();

    let status = match control.raw() {
        Some(raw) if usize::try_from(raw).is_ok_and(|raw| raw == total_videos) => {
            format!("Viewing all {total_videos} videos")
        }
        _ => format!("Page {} of {total_pages}", page.current()),
    };

    View {
        frames,
        page_size,
        total_pages,
        prev_disabled: page.current() == 1,
        next_disabled: page.current() >= total_pages,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(len: usize) -> VideoCollection {
        (0..len)
            .map(|i| VideoRecord::new(format!("https://cams.example/{i}"), format!("Camera {i}")))
            .collect()
    }

    fn indices(view: &View) -> Vec<usize> {
        view.frames.iter().map(|frame| frame.index).collect()
    }

    #[test]
    fn five_videos_two_per_page() {
        let videos = collection(5);
        let control = PageSizeControl::new(2, [1, 2, 4]);

        let first = render(&videos, &control, PageState::new(1));
        assert_eq!(first.total_pages, 3);
        assert_eq!(indices(&first), [0, 1]);
        assert!(first.prev_disabled);
        assert!(!first.next_disabled);
        assert_eq!(first.status, "Page 1 of 3");

        let second = render(&videos, &control, PageState::new(2));
        assert_eq!(indices(&second), [2, 3]);
        assert!(!second.prev_disabled);

        let third = render(&videos, &control, PageState::new(3));
        assert_eq!(indices(&third), [4]);
        assert_eq!(third.frames[0].title(), "Camera 4");
        assert!(third.next_disabled);
    }

    #[test]
    fn page_size_equal_to_total_views_all() {
        let view = render(
            &collection(5),
            &PageSizeControl::new(5, [5]),
            PageState::default(),
        );

        assert_eq!(view.status, "Viewing all 5 videos");
        assert_eq!(view.total_pages, 1);
        assert_eq!(view.frames.len(), 5);
        assert!(view.prev_disabled);
        assert!(view.next_disabled);
    }

    #[test]
    fn empty_collection() {
        let view = render(
            &VideoCollection::default(),
            &PageSizeControl::new(4, [4]),
            PageState::default(),
        );

        assert_eq!(view.status, "Page 1 of 0");
        assert!(view.frames.is_empty());
        assert!(view.prev_disabled);
        assert!(view.next_disabled);
    }

    #[test]
    fn zero_control_on_empty_collection_views_all() {
        let mut control = PageSizeControl::new(4, [4]);
        control.set_value("0");

        let view = render(&VideoCollection::default(), &control, PageState::default());
        assert_eq!(view.page_size, 1);
        assert_eq!(view.status, "Viewing all 0 videos");
    }

    #[test]
    fn out_of_range_page_is_empty() {
        let view = render(
            &collection(3),
            &PageSizeControl::new(2, [2]),
            PageState::new(5),
        );

        assert!(view.frames.is_empty());
        assert!(!view.prev_disabled);
        assert!(view.next_disabled);
        assert_eq!(view.status, "Page 5 of 2");
    }

    #[test]
    fn rendering_is_idempotent() {
        let videos = collection(7);
        let control = PageSizeControl::new(3, [3]);
        let page = PageState::new(2);

        assert_eq!(
            render(&videos, &control, page),
            render(&videos, &control, page)
        );
    }
}
