//! Turnstile
//!
//! This example drives the classic coin-operated turnstile.
//!
//! Key concepts:
//! - Declaring state and event ids with `state_ids!` / `event_ids!`
//! - Entry callbacks that update a caller-owned context
//! - Ignored events and the lockout after an impossible transition
//! - Recovering with `reset`
//!
//! Run with: RUST_LOG=statechart=debug cargo run --example turnstile

use statechart::builder::{StateBuilder, StateTableBuilder};
use statechart::engine::{Dispatch, Machine};
use statechart::{event_ids, state_ids};
use tracing_subscriber::EnvFilter;

state_ids! {
    enum Turnstile {
        Root,
        Locked,
        Unlocked,
        Maintenance,
    }
}

event_ids! {
    enum Input {
        Coin,
        Push,
        Service,
        Done,
        Tamper,
    }
}

#[derive(Debug, Default)]
struct Gate {
    coins: u32,
    passages: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Turnstile Example ===\n");

    let table = StateTableBuilder::<Gate>::new()
        .state(StateBuilder::root().initial(Turnstile::Locked))?
        .state(
            StateBuilder::new(Turnstile::Locked)
                .name(Turnstile::Locked.name())
                .parent(Turnstile::Root)
                .on_exit(|_, event, _, gate: &mut Gate| {
                    if event == Some(Input::Coin.into()) {
                        gate.coins += 1;
                    }
                })
                .goto(Input::Coin, Turnstile::Unlocked)
                // Maintenance is a child of Unlocked, so this jump is not
                // reachable from Locked.
                .goto(Input::Tamper, Turnstile::Maintenance),
        )?
        .state(
            StateBuilder::new(Turnstile::Unlocked)
                .name(Turnstile::Unlocked.name())
                .parent(Turnstile::Root)
                .on_exit(|_, event, _, gate: &mut Gate| {
                    if event == Some(Input::Push.into()) {
                        gate.passages += 1;
                    }
                })
                .goto(Input::Push, Turnstile::Locked)
                .goto(Input::Service, Turnstile::Maintenance),
        )?
        .state(
            StateBuilder::new(Turnstile::Maintenance)
                .name(Turnstile::Maintenance.name())
                .parent(Turnstile::Unlocked)
                .goto(Input::Done, Turnstile::Unlocked),
        )?
        .build()?;

    let mut machine = Machine::init(&table, Gate::default());
    println!("Initial state: {:?}", machine.active_path());

    let script = [
        Input::Push,
        Input::Coin,
        Input::Push,
        Input::Coin,
        Input::Service,
        Input::Done,
        Input::Push,
    ];

    for input in script {
        let outcome = machine.send(input)?;
        let state = machine
            .current_state()
            .and_then(|s| Turnstile::try_from(s).ok())
            .map_or("?", |s| s.name());
        match outcome {
            Dispatch::Ignored => println!("{:>8}: ignored, still {state}", input.name()),
            Dispatch::Stayed(_) => println!("{:>8}: handled in place, {state}", input.name()),
            Dispatch::Transitioned { kind, .. } => {
                println!("{:>8}: {kind} -> {state}", input.name())
            }
        }
    }
    println!("\nGate after script: {:?}", machine.context());

    // Locked -> Maintenance crosses branches without a shared parent.
    match machine.send(Input::Tamper) {
        Ok(outcome) => println!("Tamper unexpectedly succeeded: {outcome:?}"),
        Err(error) => println!("Tamper failed: {error}"),
    }
    println!("Machine invalid: {}", machine.is_invalid());
    println!("Coin while invalid: {:?}", machine.send(Input::Coin));

    machine.reset();
    println!(
        "After reset: {:?}, invalid: {}",
        machine.current_state(),
        machine.is_invalid()
    );

    Ok(())
}
