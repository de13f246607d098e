//! `import doi`, `import arxiv` and `import bib`.

use bibliophant_importers::{arxiv_to_record, doi_to_record};
use bibliophant_storage::{load_record_file, Transaction};
use tracing::info;

use super::{expand_tilde, file_record, pdf_argument, store_pdf, words, Attachment};
use crate::command::{Command, CommandGroup};
use crate::context::Context;
use crate::error::BuildError;
use crate::output::Output;
use crate::{Error, Result};

pub(crate) fn group() -> std::result::Result<CommandGroup, BuildError> {
    CommandGroup::builder("import")
        .add("doi", ImportDoi)
        .add("arxiv", ImportArxiv)
        .add("bib", ImportRecordFolder)
        .build()
}

struct ImportDoi;

impl Command for ImportDoi {
    fn execute(
        &self,
        args: &str,
        txn: &mut Transaction<'_>,
        ctx: &mut Context,
        _input: Option<Output>,
    ) -> Result<Option<Output>> {
        let words = words(args)?;
        let (doi, attachment) = match words.as_slice() {
            [doi] => (doi, Attachment::None),
            [doi, pdf] => (doi, Attachment::MovePdf(pdf_argument(pdf)?)),
            _ => {
                return Err(Error::aborted(
                    "'import doi' takes a DOI and optionally the path of a PDF file",
                ))
            }
        };
        if let Some(existing) = txn.find_by_doi(doi) {
            return Err(Error::aborted(format!(
                "the record '{}' already has the DOI '{}'",
                existing.key, doi
            )));
        }

        let draft = doi_to_record(ctx.source(), doi)?;
        let record = file_record(txn, ctx, draft, attachment)?;
        Ok(Some(Output::Records(vec![record])))
    }
}

struct ImportArxiv;

impl Command for ImportArxiv {
    fn execute(
        &self,
        args: &str,
        txn: &mut Transaction<'_>,
        ctx: &mut Context,
        _input: Option<Output>,
    ) -> Result<Option<Output>> {
        let words = words(args)?;
        let [id] = words.as_slice() else {
            return Err(Error::aborted("'import arxiv' takes exactly one arXiv id"));
        };
        let id = id.strip_prefix("arXiv:").unwrap_or(id.as_str());
        if let Some(existing) = txn.find_by_arxiv(id) {
            return Err(Error::aborted(format!(
                "the record '{}' already is the eprint '{}'",
                existing.key, id
            )));
        }

        let draft = arxiv_to_record(ctx.source(), id)?;
        let record = file_record(txn, ctx, draft, Attachment::None)?;

        let pdf = ctx.source().arxiv_pdf(id)?;
        let path = store_pdf(ctx, &record, &pdf)?;
        info!(target: "bibliophant::import", id, file = %path.display(), "Downloaded eprint");
        Ok(Some(Output::Records(vec![record])))
    }
}

struct ImportRecordFolder;

impl Command for ImportRecordFolder {
    fn execute(
        &self,
        args: &str,
        txn: &mut Transaction<'_>,
        ctx: &mut Context,
        _input: Option<Output>,
    ) -> Result<Option<Output>> {
        let words = words(args)?;
        let [folder] = words.as_slice() else {
            return Err(Error::aborted(
                "'import bib' takes exactly the path of a record folder",
            ));
        };
        let path = expand_tilde(folder);
        let folder = if path.is_file() {
            path.parent().map(|p| p.to_path_buf()).unwrap_or_default()
        } else {
            path.clone()
        };

        let draft = load_record_file(&path)?;
        let record = file_record(txn, ctx, draft, Attachment::CopyFolder(folder))?;
        Ok(Some(Output::Records(vec![record])))
    }
}
