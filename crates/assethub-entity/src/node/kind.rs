//! Asset kind and processing status enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use assethub_core::AppError;

/// Closed set of asset subtypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// PDF document (container of pages).
    Pdf,
    /// Captured web page.
    Web,
    /// Image.
    Image,
    /// Video.
    Video,
    /// Audio recording.
    Audio,
    /// Plain text.
    Text,
    /// CSV table (container of rows).
    Csv,
    /// One tabular row.
    CsvRow,
    /// Mailbox archive.
    Mbox,
    /// Single email.
    Email,
    /// One page of a PDF.
    PdfPage,
    /// Chunk of a longer text.
    TextChunk,
    /// Region of an image.
    ImageRegion,
    /// Scene of a video.
    VideoScene,
    /// Segment of an audio recording.
    AudioSegment,
    /// Composed article.
    Article,
    /// RSS feed (container of articles).
    RssFeed,
    /// Generic uploaded file.
    File,
}

impl AssetKind {
    /// Return the kind as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Web => "web",
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Text => "text",
            Self::Csv => "csv",
            Self::CsvRow => "csv_row",
            Self::Mbox => "mbox",
            Self::Email => "email",
            Self::PdfPage => "pdf_page",
            Self::TextChunk => "text_chunk",
            Self::ImageRegion => "image_region",
            Self::VideoScene => "video_scene",
            Self::AudioSegment => "audio_segment",
            Self::Article => "article",
            Self::RssFeed => "rss_feed",
            Self::File => "file",
        }
    }

    /// Kinds whose children are content that belongs with the parent
    /// (embedded images of an article or web capture, messages of a mailbox).
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            Self::Article | Self::Web | Self::RssFeed | Self::Email | Self::Mbox
        )
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.to_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "web" => Self::Web,
            "image" => Self::Image,
            "video" => Self::Video,
            "audio" => Self::Audio,
            "text" => Self::Text,
            "csv" => Self::Csv,
            "csv_row" => Self::CsvRow,
            "mbox" => Self::Mbox,
            "email" => Self::Email,
            "pdf_page" => Self::PdfPage,
            "text_chunk" => Self::TextChunk,
            "image_region" => Self::ImageRegion,
            "video_scene" => Self::VideoScene,
            "audio_segment" => Self::AudioSegment,
            "article" => Self::Article,
            "rss_feed" => Self::RssFeed,
            "file" => Self::File,
            _ => {
                return Err(AppError::validation(format!("Invalid asset kind: '{s}'")));
            }
        };
        Ok(kind)
    }
}

/// Status of server-side processing that creates child assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    /// No processing needed or processing completed.
    Ready,
    /// Waiting to be processed.
    Pending,
    /// Currently being processed.
    Processing,
    /// Processing failed.
    Failed,
}
