//! Counter Example - computed bindings and a rebuilt list
//!
//! This example demonstrates:
//! - A button incrementing a reactive counter
//! - A text following the counter through a computed binding
//! - A list rebuilt from a reactive collection with `builder`
//! - A named binding resolved from the root's providers after construction
//!
//! Run with: RUST_LOG=spark_tree=debug cargo run --example counter

use spark_tree::primitives::{button_with, hbox, text, text_field, vbox, wrap};
use spark_tree::widgets::Button;
use spark_tree::{
    Findable, Hierarchy, LaunchOptions, Mode, ReactiveCollection, ReactiveValue, Root, Scope,
    Stage, Value, Verbosity,
};
use tracing_subscriber::EnvFilter;

fn main() -> spark_tree::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== spark-tree Counter Example ===\n");

    let count = ReactiveValue::new(Value::Int(0));
    let history: ReactiveCollection<i64> = ReactiveCollection::new();

    let label = text("");
    label.set_id("count")?;
    label.compute("text", &count, |n| {
        format!("Count: {}", n.and_then(Value::as_int).unwrap_or(0))
    })?;

    let counter = count.clone();
    let log = history.clone();
    let increment = button_with("+1", move |_, _| {
        let next = counter.get().and_then(|n| n.as_int()).unwrap_or(0) + 1;
        counter.set(Value::Int(next));
        if let Err(err) = log.add(next) {
            tracing::warn!(%err, "history update failed");
        }
    });
    increment.add_class("primary")?;

    let list = vbox([]).builder(&history, |n| text(format!("clicked -> {n}")))?;
    list.set_id("history")?;

    // Deferred: the wrapper has no handle until construction.
    let greeting = wrap(text_field("Your name"));
    greeting.bind_named("text", "greeting")?;

    let root = Root::new(hbox([vbox([label, increment.clone(), greeting]), list]));
    root.provide("greeting", ReactiveValue::new(Value::from("world")));

    let stage = Stage::new();
    root.launch_with(
        &stage,
        LaunchOptions {
            title: Some("Counter".to_string()),
            width: Some(320.0),
            height: Some(240.0),
            mode: Mode::Debug,
        },
    )?;
    root.enable_developer_shortcuts()?;
    root.add_stylesheet("counter.css")?;

    let button = increment.handle().ok_or_else(|| {
        spark_tree::Error::IllegalState("button was not constructed".to_string())
    })?;
    for _ in 0..3 {
        Button::click(&button);
    }

    if let Some(shown) = root.find_by_id("count", Scope::Subtree)? {
        println!("{}", shown.get("text")?);
    }
    println!("\n{}", root.hierarchy(Verbosity::Detailed));

    root.close()?;
    println!("Stage showing after close: {}", stage.is_showing());
    Ok(())
}
