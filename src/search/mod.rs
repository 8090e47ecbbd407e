//! Tantivy-based search over the e-book.
//!
//! The book is small and static, so the index lives in RAM and is built once
//! at startup. Accents are folded so "exercicio" finds "exercício".

use std::sync::Arc;

use serde::Serialize;
use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, BoostQuery, Occur, QueryParser};
use tantivy::schema::{
    Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, Value, STORED,
};
use tantivy::tokenizer::{AsciiFoldingFilter, LowerCaser, RemoveLongFilter, SimpleTokenizer, TextAnalyzer};
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument};
use tokio::sync::RwLock;

use crate::content::Ebook;
use crate::errors::AppError;

const TOKENIZER: &str = "pt_folded";

const BOOST_TITLE: f32 = 3.0;
const BOOST_BODY: f32 = 1.0;

/// A chapter matching the query.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub chapter_id: u32,
    pub title: String,
    pub score: f32,
}

struct SearchFields {
    chapter_id: Field,
    title: Field,
    body: Field,
}

pub struct EbookSearch {
    index: Index,
    reader: IndexReader,
    writer: Arc<RwLock<IndexWriter>>,
    fields: SearchFields,
}

impl EbookSearch {
    /// Create an empty in-memory index.
    pub fn open() -> Result<Self, AppError> {
        let text = TextOptions::default().set_indexing_options(
            TextFieldIndexing::default()
                .set_tokenizer(TOKENIZER)
                .set_index_option(IndexRecordOption::WithFreqsAndPositions),
        );

        let mut schema_builder = Schema::builder();
        let chapter_id = schema_builder.add_u64_field("chapter_id", STORED);
        let title = schema_builder.add_text_field("title", text.clone().set_stored());
        let body = schema_builder.add_text_field("body", text);
        let schema = schema_builder.build();

        let index = Index::create_in_ram(schema);
        index.tokenizers().register(
            TOKENIZER,
            TextAnalyzer::builder(SimpleTokenizer::default())
                .filter(RemoveLongFilter::limit(40))
                .filter(LowerCaser)
                .filter(AsciiFoldingFilter)
                .build(),
        );

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e| AppError::Search(format!("Failed to create reader: {}", e)))?;

        let writer = index
            .writer_with_num_threads(1, 20_000_000)
            .map_err(|e| AppError::Search(format!("Failed to create writer: {}", e)))?;

        Ok(Self {
            index,
            reader,
            writer: Arc::new(RwLock::new(writer)),
            fields: SearchFields {
                chapter_id,
                title,
                body,
            },
        })
    }

    /// Replace the index contents with every chapter of `book`.
    pub async fn rebuild(&self, book: &Ebook) -> Result<(), AppError> {
        let mut writer = self.writer.write().await;
        writer.delete_all_documents()?;

        for chapter in book.chapters() {
            writer.add_document(doc!(
                self.fields.chapter_id => u64::from(chapter.id),
                self.fields.title => chapter.title.clone(),
                self.fields.body => chapter.body()
            ))?;
        }

        writer.commit()?;
        self.reader.reload()?;

        tracing::info!("E-book index built with {} chapters", book.chapters().len());
        Ok(())
    }

    /// Chapters matching `query_str`, best first.
    ///
    /// Query syntax errors are tolerated: whatever part of the query parses
    /// is used.
    pub fn search(&self, query_str: &str, limit: usize) -> Result<Vec<SearchHit>, AppError> {
        if query_str.trim().is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let searcher = self.reader.searcher();

        let mut subqueries: Vec<(Occur, Box<dyn tantivy::query::Query>)> = Vec::new();
        for (field, boost) in [
            (self.fields.title, BOOST_TITLE),
            (self.fields.body, BOOST_BODY),
        ] {
            let parser = QueryParser::for_index(&self.index, vec![field]);
            let (query, errors) = parser.parse_query_lenient(query_str);
            if !errors.is_empty() {
                tracing::debug!("Lenient parse of {:?}: {:?}", query_str, errors);
            }
            subqueries.push((Occur::Should, Box::new(BoostQuery::new(query, boost))));
        }
        let query = BooleanQuery::new(subqueries);

        let top_docs = searcher
            .search(&query, &TopDocs::with_limit(limit))
            .map_err(|e| AppError::Search(format!("Search failed: {}", e)))?;

        let hits = top_docs
            .into_iter()
            .filter_map(|(score, address)| {
                let doc: TantivyDocument = searcher.doc(address).ok()?;
                let chapter_id = doc.get_first(self.fields.chapter_id)?.as_u64()?;
                let title = doc.get_first(self.fields.title)?.as_str()?.to_string();
                Some(SearchHit {
                    chapter_id: u32::try_from(chapter_id).ok()?,
                    title,
                    score,
                })
            })
            .collect();

        Ok(hits)
    }
}
