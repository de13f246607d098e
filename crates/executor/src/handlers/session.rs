//! Solo commands: `exit` and `help`.

use std::io::Write;

use bibliophant_storage::Transaction;

use crate::command::Command;
use crate::context::Context;
use crate::output::Output;
use crate::{Error, Result};

fn no_arguments(command: &str, args: &str) -> Result<()> {
    if args.trim().is_empty() {
        Ok(())
    } else {
        Err(Error::aborted(format!("'{}' takes no arguments", command)))
    }
}

/// `exit`
pub(crate) struct Exit;

impl Command for Exit {
    fn execute(
        &self,
        args: &str,
        _txn: &mut Transaction<'_>,
        ctx: &mut Context,
        _input: Option<Output>,
    ) -> Result<Option<Output>> {
        no_arguments("exit", args)?;
        ctx.request_exit();
        Ok(None)
    }
}

/// `help`
pub(crate) struct Help;

impl Command for Help {
    fn execute(
        &self,
        args: &str,
        _txn: &mut Transaction<'_>,
        ctx: &mut Context,
        _input: Option<Output>,
    ) -> Result<Option<Output>> {
        no_arguments("help", args)?;
        ctx.out().write_all(MANUAL.as_bytes())?;
        Ok(None)
    }
}

/// The text printed by `help`.
pub const MANUAL: &str = r#"Bibliophant manual
------------------


# Queries

Bibliophant builds larger queries out of smaller pieces, much like the pipe
character "|" in Unix shells. Since queries can be given directly on the
command line of such a shell, the parts of a pipeline are separated by " : "
instead. The spaces to either side of the colon are part of the separator.

A query either succeeds as a whole or changes nothing in the collection.


## Solo queries (closed-closed)

These commands cannot be chained.

`exit`
    Quits the application.

`help`
    Shows this document.


## Queries that produce records (closed-producing)

These commands must stand at the beginning of a pipeline. They pass the
records they create or find on to the following command.

All 'add' and 'import' commands open the record editor, store the record
in the collection and write it to a JSON file in a new record folder.
An empty key is generated from the year and the authors' last names.

`add (article | book) [<path to pdf>]` --> {record}
    Opens the editor on an empty article or book.
    If a path to a PDF file is given,
    the file is moved into the new record folder.

`import doi <DOI> [<path to pdf>]` --> {record}
    Fetches the bibliographic data of the DOI from Crossref
    and opens the editor with those fields filled in.
    If a path to a PDF file is given,
    the file is moved into the new record folder.

`import arxiv <arXiv id>` --> {record}
    Fetches the bibliographic data from the arXiv
    (and from Crossref, if the eprint has been published)
    and opens the editor with those fields filled in.
    Downloads the eprint into the new record folder.

`import bib <path to external record folder>` --> {record}
    Reads a record folder of another bibliophant collection
    and opens the editor with its fields filled in.
    Other files of that folder (usually PDFs)
    are copied into the new record folder.

`get key <record key>` --> {record}
    Passes on the record with the given key.

`get title <part of a title>` --> {records}
    Passes on the records whose title contains the given text.

`get doi <DOI>` --> {record}
    Passes on the record with the given DOI.

`get arxiv <arXiv id>` --> {record}
    Passes on the article with the given arXiv id.


The following commands usually produce several records.
If a positive integer (limit) is given as the last word,
only the <limit> most recently added records are passed on.

`get all [<limit>]` --> {records}
    Passes on all records, most recently added first.

`get tag <tag name> [<limit>]` --> {records}
    Passes on the records which carry the tag.

`get author <author name> [<limit>]` --> {records}
    Passes on the records written by the author.
    The name may be a last name, "Last, First" or "First Last".

`get journal <journal name> [<limit>]` --> {records}
    Passes on the articles published in the journal.

`get publisher <publisher name> [<limit>]` --> {records}
    Passes on the books published by the publisher.


## Follow-up queries (receiving-producing)

These commands must follow a producing command.
They pass on every record they receive.

{records} --> `tag <tag name> [create [<color>]]` --> {records}
    Tags every received record.
    If the tag does not exist yet, its creation has to be confirmed,
    unless the 'create' option is given. That option takes an
    optional hexadecimal color code (e.g. D19F93).

{records} --> `untag <tag name> [yes]` --> {records}
    Removes the tag from every received record.
    If no record carries the tag afterwards, asks whether
    the tag should be deleted; 'yes' answers in advance.


## Terminal follow-up queries (receiving-closed)

These commands must follow a producing command
and end the pipeline.

{records} --> `show [verbose]`
    Prints key and title of every received record,
    and a short summary when there are several.
    'verbose' adds authors, year, tags, journal or publisher,
    DOI and eprint.

{records} --> `open [folder]`
    Opens the file '<title>.pdf' in the folder of every record.
    If there is no such file or the 'folder' option is given,
    opens the record folder itself.

{records} --> `export bibtex [<path to bib file> [overwrite]]`
    Converts the received records to BibTeX.
    Without a path the result is printed.
    An existing file is only overwritten after confirmation,
    or when the 'overwrite' option is given.

{records} --> `delete [yes] [dangling]`
    Deletes the received records, asking for each one
    unless 'yes' is given. Record folders are deleted
    once the query has succeeded.
    Tags, journals and publishers left without records
    are deleted after confirmation, or right away
    when 'dangling' is given.


## Examples

- Add an article and move a PDF file into its record folder:
  `add article ~/Downloads/some_article.pdf`

- Open the record folder of the record '2012GregoryStone':
  `get key 2012GregoryStone : open folder`

- Show the five most recently added records:
  `get all 5 : show`

- Open at most three records tagged 'read-me' and remove the tag:
  `get tag read-me 3 : untag read-me : open`

- Delete, without asking, every record tagged 'trash':
  `get tag trash : delete yes`

- Export the whole collection to a BibTeX file:
  `get all : export bibtex ~/Desktop/references.bib overwrite`


# Configuration

The configuration file '~/.bibliophant.toml' is created with commented
defaults on first start. It might look like this:

    collections = ["~/papers", "~/other/papers"]
    open_pdf = "xdg-open"
    open_folder = "xdg-open"
    delete_folder = "rm -rf"
    editor = "vim"
    timeout_secs = 20

The first collection is used unless another one is chosen with '-c'.
"#;
