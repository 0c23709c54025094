//! Console walkthrough of the four record operations.
//!
//! Drives the coordinator the way an embedding application would: fire an
//! operation, receive the result in a completion callback, and use a
//! channel to sequence the next step on the main thread.

use duplex_hub::Hub;
use std::process::ExitCode;
use std::sync::mpsc::channel;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // An unopenable store is fatal: no context pair can exist without it.
    let hub = match Hub::in_memory() {
        Ok(hub) => hub,
        Err(err) => {
            eprintln!("failed to open store: {err}");
            return ExitCode::FAILURE;
        }
    };

    let (tx, rx) = channel();
    hub.create("New Record", move |record| {
        println!("created: {} ({})", record.name().unwrap_or("unnamed"), record.id);
        tx.send(record).unwrap();
    });
    let record = rx.recv().expect("create callback");

    let (tx, rx) = channel();
    hub.read(move |records| {
        println!("records: {records:?}");
        tx.send(()).unwrap();
    });
    rx.recv().expect("read callback");

    let (tx, rx) = channel();
    hub.update(&record, "Updated Record", move |result| {
        match &result {
            Ok(updated) => println!("updated: {}", updated.name().unwrap_or("unnamed")),
            Err(err) => println!("update failed: {err}"),
        }
        tx.send(result).unwrap();
    });
    let record = rx.recv().expect("update callback").expect("update result");

    let (tx, rx) = channel();
    hub.delete(&record, move |result| {
        match &result {
            Ok(()) => println!("deleted"),
            Err(err) => println!("delete failed: {err}"),
        }
        tx.send(()).unwrap();
    });
    rx.recv().expect("delete callback");

    let (tx, rx) = channel();
    hub.read(move |records| {
        println!("records after delete: {records:?}");
        tx.send(()).unwrap();
    });
    rx.recv().expect("read callback");

    ExitCode::SUCCESS
}
