//! Test modules for the executor crate.

pub mod completion;
pub mod properties;

use std::cell::RefCell;
use std::rc::Rc;

use bibliophant_core::{Article, Author, Journal, Record, RecordKind};
use bibliophant_storage::{Catalog, Transaction};

use crate::{Command, Context, Engine, Error, Output, Result, Role};

/// A valid article.
pub(crate) fn article(key: &str, title: &str, last: &str, journal: &str) -> Record {
    let year = key[..4].parse().unwrap();
    Record::new(
        key,
        title,
        year,
        vec![Author::new(last, Some("Ann")).unwrap()],
        RecordKind::Article(Article {
            journal: Journal::new(journal),
            volume: None,
            number: None,
            pages: None,
            eprint: None,
            abstract_text: None,
        }),
    )
}

/// Log of what the stub commands saw.
pub(crate) type Trace = Rc<RefCell<Vec<String>>>;

/// Inserts an article under the key given as argument and produces it.
pub(crate) struct Emit(pub Trace);

impl Command for Emit {
    fn execute(
        &self,
        args: &str,
        txn: &mut Transaction<'_>,
        _ctx: &mut Context,
        input: Option<Output>,
    ) -> Result<Option<Output>> {
        self.0.borrow_mut().push(format!("emit {} {:?}", args, keys(&input)));
        let key = if args.is_empty() { "2012GregoryStone" } else { args };
        let record = article(key, "Some Long Title", "Gregory", "Physical Review");
        txn.insert(record.clone())?;
        let mut records = input.map(Output::into_records).unwrap_or_default();
        records.push(record);
        Ok(Some(Output::Records(records)))
    }

    fn complete(&self, partial: &str, catalog: &Catalog) -> Vec<String> {
        crate::complete_word(partial, catalog.records.keys().map(String::as_str))
    }
}

/// Passes its input on and logs it.
pub(crate) struct Pass(pub Trace);

impl Command for Pass {
    fn execute(
        &self,
        args: &str,
        _txn: &mut Transaction<'_>,
        _ctx: &mut Context,
        input: Option<Output>,
    ) -> Result<Option<Output>> {
        self.0.borrow_mut().push(format!("pass {} {:?}", args, keys(&input)));
        Ok(input)
    }
}

/// Logs its input and produces nothing.
pub(crate) struct Sink(pub Trace);

impl Command for Sink {
    fn execute(
        &self,
        args: &str,
        _txn: &mut Transaction<'_>,
        _ctx: &mut Context,
        input: Option<Output>,
    ) -> Result<Option<Output>> {
        self.0.borrow_mut().push(format!("sink {} {:?}", args, keys(&input)));
        Ok(None)
    }
}

/// Always aborts.
pub(crate) struct Fail(pub Trace);

impl Command for Fail {
    fn execute(
        &self,
        _args: &str,
        _txn: &mut Transaction<'_>,
        _ctx: &mut Context,
        _input: Option<Output>,
    ) -> Result<Option<Output>> {
        self.0.borrow_mut().push("fail".to_string());
        Err(Error::aborted("failed on purpose"))
    }
}

/// Asks the session to end.
pub(crate) struct Quit;

impl Command for Quit {
    fn execute(
        &self,
        _args: &str,
        _txn: &mut Transaction<'_>,
        ctx: &mut Context,
        _input: Option<Output>,
    ) -> Result<Option<Output>> {
        ctx.request_exit();
        Ok(None)
    }
}

pub(crate) fn keys(output: &Option<Output>) -> Vec<String> {
    output
        .as_ref()
        .map(|o| o.records().iter().map(|r| r.key.clone()).collect())
        .unwrap_or_default()
}

/// An engine of stub commands, one per role, plus a failing one and a
/// solo `quit`.
pub(crate) fn stub_engine(trace: &Trace) -> Engine {
    Engine::builder()
        .register("quit", Role::ClosedClosed, Quit)
        .register("emit", Role::ClosedProducing, Emit(Rc::clone(trace)))
        .register("pass", Role::ReceivingProducing, Pass(Rc::clone(trace)))
        .register("fail", Role::ReceivingProducing, Fail(Rc::clone(trace)))
        .register("sink", Role::ReceivingClosed, Sink(Rc::clone(trace)))
        .build()
        .unwrap()
}
