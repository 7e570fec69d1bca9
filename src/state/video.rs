use std::ops::Range;

/// One entry of the wall: where to play it from and what to call it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRecord {
    url: String,
    title: String,
}

impl VideoRecord {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Videos in display order. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoCollection {
    videos: Vec<VideoRecord>,
}

impl VideoCollection {
    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    /// Records within `range`; out-of-bounds parts are dropped.
    pub fn slice(&self, range: Range<usize>) -> &[VideoRecord] {
        let end = range.end.min(self.videos.len());
        let start = range.start.min(end);
        &self.videos[start..end]
    }
}

impl From<Vec<VideoRecord>> for VideoCollection {
    fn from(videos: Vec<VideoRecord>) -> Self {
        Self { videos }
    }
}

impl FromIterator<VideoRecord> for VideoCollection {
    fn from_iter<I: IntoIterator<Item = VideoRecord>>(iter: I) -> Self {
        Self {
            videos: iter.into_iter().collect(),
        }
    }
}
