//! `add article` and `add book`: file a record typed in from scratch.

use bibliophant_core::{Article, Author, Book, Journal, Publisher, Record, RecordKind};
use bibliophant_storage::Transaction;
use chrono::Datelike;

use super::{file_record, pdf_argument, words, Attachment};
use crate::command::{Command, CommandGroup};
use crate::context::Context;
use crate::error::BuildError;
use crate::output::Output;
use crate::{Error, Result};

pub(crate) fn group() -> std::result::Result<CommandGroup, BuildError> {
    CommandGroup::builder("add")
        .add("article", AddRecord { book: false })
        .add("book", AddRecord { book: true })
        .build()
}

/// The empty draft the editor starts from.
pub(crate) fn template(book: bool) -> Record {
    let kind = if book {
        RecordKind::Book(Book {
            publisher: Publisher {
                name: String::new(),
                address: None,
            },
            volume: None,
            edition: None,
            series: None,
        })
    } else {
        RecordKind::Article(Article {
            journal: Journal {
                name: String::new(),
            },
            volume: None,
            number: None,
            pages: None,
            eprint: None,
            abstract_text: None,
        })
    };
    let author = Author {
        last: String::new(),
        first: Some(String::new()),
        email: None,
    };
    let year = chrono::Local::now().year();
    Record::new("", "", year, vec![author], kind)
}

struct AddRecord {
    book: bool,
}

impl Command for AddRecord {
    fn execute(
        &self,
        args: &str,
        txn: &mut Transaction<'_>,
        ctx: &mut Context,
        _input: Option<Output>,
    ) -> Result<Option<Output>> {
        let attachment = match words(args)?.as_slice() {
            [] => Attachment::None,
            [pdf] => Attachment::MovePdf(pdf_argument(pdf)?),
            _ => {
                return Err(Error::aborted(
                    "'add' takes at most the path of a PDF file",
                ))
            }
        };
        let record = file_record(txn, ctx, template(self.book), attachment)?;
        Ok(Some(Output::Records(vec![record])))
    }
}
