//! Shared fixtures for unit tests: an in-memory store, generated PDFs and a
//! scripted completion client.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use crate::db::create_pool;
use crate::llm_client::{CompletionClient, CompletionError};
use crate::store::{Records, SqliteStore};

pub async fn memory_records() -> Records {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    Records::new(Arc::new(SqliteStore::new(pool).await.unwrap()))
}

/// Builds a PDF with one page per entry. `None` pages carry no content stream,
/// like a scanned page with no text layer.
pub fn sample_pdf(pages: &[Option<&str>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for page in pages {
        let mut page_dict = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Resources" => resources_id,
        };
        if let Some(text) = page {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            page_dict.set("Contents", content_id);
        }
        kids.push(Object::from(doc.add_object(page_dict)));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// One scripted response from [`FakeCompletion`].
pub enum FakeReply {
    Text(String),
    /// Upstream failure (HTTP 500).
    Fail,
    /// Never resolves; exercises the pipeline's timeout.
    Hang,
}

impl FakeReply {
    pub fn text(reply: &str) -> Self {
        FakeReply::Text(reply.to_string())
    }
}

/// Completion client that replays queued replies in order and records every prompt.
pub struct FakeCompletion {
    replies: Mutex<VecDeque<FakeReply>>,
    prompts: Mutex<Vec<String>>,
}

impl FakeCompletion {
    pub fn new(replies: Vec<FakeReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for FakeCompletion {
    async fn complete(&self, _system: &str, prompt: &str) -> Result<String, CompletionError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let next = self.replies.lock().unwrap().pop_front();

        match next {
            Some(FakeReply::Text(text)) => Ok(text),
            Some(FakeReply::Fail) => Err(CompletionError::Api {
                status: 500,
                message: "upstream unavailable".to_string(),
            }),
            Some(FakeReply::Hang) => std::future::pending().await,
            None => Err(CompletionError::EmptyContent),
        }
    }

    fn model(&self) -> &str {
        "fake-model"
    }
}
