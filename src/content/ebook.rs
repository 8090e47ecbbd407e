//! E-book catalogue and reader navigation.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Page count of the printed book.
pub const TOTAL_PAGES: u32 = 175;

/// Pages allotted to each chapter when jumping to it.
const PAGES_PER_CHAPTER: u32 = 15;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Title,
    Subtitle,
    Paragraph,
    List,
    Tip,
    Warning,
    Example,
}

/// Text of a block: a single string, or the items of a list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum BlockContent {
    Text(String),
    Items(Vec<String>),
}

impl BlockContent {
    pub fn plain_text(&self) -> String {
        match self {
            BlockContent::Text(text) => text.clone(),
            BlockContent::Items(items) => items.join("\n"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Block {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub content: BlockContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chapter {
    pub id: u32,
    pub title: String,
    /// Page span as printed in the table of contents, e.g. "16-35"
    pub pages: String,
    pub content: Vec<Block>,
}

impl Chapter {
    /// Every block's text, one per line.
    pub fn body(&self) -> String {
        self.content
            .iter()
            .map(|block| block.content.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Table of contents entry.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChapterSummary {
    pub id: u32,
    pub title: String,
    pub pages: String,
    pub start_page: u32,
}

/// Reader position: the selected chapter and the page shown.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReaderPosition {
    pub chapter: u32,
    pub page: u32,
}

impl Default for ReaderPosition {
    fn default() -> Self {
        Self { chapter: 1, page: 1 }
    }
}

impl ReaderPosition {
    /// Jump to the first page of a chapter.
    pub fn open_chapter(&mut self, chapter_id: u32) {
        self.chapter = chapter_id;
        self.page = chapter_start_page(chapter_id);
    }

    /// Go to `page`. Pages outside the book are ignored.
    pub fn turn_to(&mut self, page: i64) -> bool {
        if (1..=i64::from(TOTAL_PAGES)).contains(&page) {
            self.page = page as u32;
            true
        } else {
            false
        }
    }
}

pub fn chapter_start_page(chapter_id: u32) -> u32 {
    chapter_id.saturating_sub(1) * PAGES_PER_CHAPTER + 1
}

/// Page number typed by the reader; anything unparsable means page 1.
pub fn parse_page(raw: &str) -> i64 {
    raw.trim().parse().unwrap_or(1)
}

#[derive(Debug, Clone)]
pub struct Ebook {
    chapters: Vec<Chapter>,
}

impl Ebook {
    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        let chapters: Vec<Chapter> = serde_json::from_str(raw)
            .map_err(|e| AppError::Internal(format!("Invalid e-book content: {}", e)))?;
        if chapters.is_empty() {
            return Err(AppError::Internal("E-book has no chapters".to_string()));
        }
        Ok(Self { chapters })
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn chapter(&self, id: u32) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.id == id)
    }

    pub fn table_of_contents(&self) -> Vec<ChapterSummary> {
        self.chapters
            .iter()
            .map(|c| ChapterSummary {
                id: c.id,
                title: c.title.clone(),
                pages: c.pages.clone(),
                start_page: chapter_start_page(c.id),
            })
            .collect()
    }
}
