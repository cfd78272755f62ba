//! Demonstration of derived stores: todo statistics across two lists
//!
//! Run with `RUST_LOG=tincan_derive=trace` to see every recomputation.

use tincan_derive::{derive_with, DeriveOptions, Store};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug)]
struct TodoItem {
    title: String,
    completed: bool,
}

#[derive(Clone, Debug, PartialEq)]
struct Stats {
    total: usize,
    active: usize,
    completed: usize,
}

fn add_todo(list: &Store<Vec<TodoItem>>, title: &str) {
    list.update(|todos| {
        todos.push(TodoItem {
            title: title.to_string(),
            completed: false,
        })
    });
}

fn toggle_todo(list: &Store<Vec<TodoItem>>, index: usize) {
    list.update(|todos| {
        if let Some(todo) = todos.get_mut(index) {
            todo.completed = !todo.completed;
        }
    });
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Derived Store Example: Todo Statistics ===\n");

    let work = Store::new(Vec::<TodoItem>::new());
    let home = Store::new(Vec::<TodoItem>::new());

    // Statistics over both lists
    let stats = derive_with(
        DeriveOptions::new().with_label("todo-stats"),
        &[&work, &home],
        |lists, _, _| {
            let total = lists.iter().map(Vec::len).sum::<usize>();
            let completed = lists
                .iter()
                .flat_map(|todos| todos.iter())
                .filter(|todo| todo.completed)
                .count();
            Stats {
                total,
                active: total - completed,
                completed,
            }
        },
    );

    println!("1. Setting up subscriber");
    let _sub = stats.subscribe(|stats, prev| {
        println!(
            "   [Stats Update] Total: {} (was {}), Active: {}, Completed: {}",
            stats.total, prev.total, stats.active, stats.completed
        );
    });

    println!("\n2. Adding todos");
    add_todo(&work, "Learn Rust");
    add_todo(&work, "Build reactive library");
    add_todo(&home, "Write documentation");

    println!("\n3. Completing first work todo");
    toggle_todo(&work, 0);

    println!("\n4. Current todos:");
    for (name, list) in [("work", &work), ("home", &home)] {
        list.read(|todos| {
            for todo in todos {
                let status = if todo.completed { "✓" } else { " " };
                println!("   {name}: [{status}] {}", todo.title);
            }
        });
    }

    println!("\n5. Trying to write the derived store");
    if let Err(err) = stats.set_state(Stats {
        total: 0,
        active: 0,
        completed: 0,
    }) {
        println!("   rejected: {err}");
    }

    println!("\n6. Destroying the derived store");
    stats.destroy();
    add_todo(&home, "Not counted");
    let Stats {
        total,
        active,
        completed,
    } = stats.get_state();
    println!("   Total: {}", total);
    println!("   Active: {}", active);
    println!("   Completed: {}", completed);

    println!("\n✓ Example complete!");
}
