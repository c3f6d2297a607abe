//! Media Player
//!
//! This example builds a nested statechart for a media player and runs it
//! with the least-common-ancestor transition policy.
//!
//! Key concepts:
//! - Composite states with default children
//! - Actions inherited from enclosing states
//! - Event payloads and internal reactions that keep the current state
//! - Transition history and checkpoint/resume
//!
//! Run with: RUST_LOG=statechart=trace cargo run --example media_player

use statechart::builder::{StateBuilder, StateTableBuilder};
use statechart::checkpoint::Checkpoint;
use statechart::core::{StateTable, TransitionPolicy};
use statechart::engine::{EngineError, Machine};
use statechart::{event_ids, state_ids};
use tracing_subscriber::EnvFilter;

//            Root
//           /    \
//         Off     On
//                /  \
//          Stopped   Active
//                    /    \
//               Playing  Paused
state_ids! {
    enum Player {
        Root,
        Off,
        On,
        Stopped,
        Active,
        Playing,
        Paused,
    }
}

event_ids! {
    enum Command {
        Power,
        Play,
        Pause,
        Stop,
        Seek,
    }
}

/// Seconds into the current track.
type Position = u32;

#[derive(Debug, Default)]
struct Deck {
    position: Position,
    spins: u32,
}

fn player() -> Result<StateTable<Deck, Position>, Box<dyn std::error::Error>> {
    let table = StateTableBuilder::<Deck, Position>::new()
        .policy(TransitionPolicy::LeastCommonAncestor)
        .state(StateBuilder::root().initial(Player::Off))?
        .state(
            StateBuilder::new(Player::Off)
                .name(Player::Off.name())
                .parent(Player::Root)
                .goto(Command::Power, Player::On),
        )?
        .state(
            StateBuilder::new(Player::On)
                .name(Player::On.name())
                .parent(Player::Root)
                .initial(Player::Stopped)
                .goto(Command::Power, Player::Off),
        )?
        .state(
            StateBuilder::new(Player::Stopped)
                .name(Player::Stopped.name())
                .parent(Player::On)
                .on_enter(|_, _, _, deck: &mut Deck| deck.position = 0)
                .goto(Command::Play, Player::Playing),
        )?
        .state(
            StateBuilder::new(Player::Active)
                .name(Player::Active.name())
                .parent(Player::On)
                .initial(Player::Playing)
                .on(Command::Seek, |state, _, to: &Position, deck: &mut Deck| {
                    deck.position = *to;
                    state
                })
                .goto(Command::Stop, Player::Stopped),
        )?
        .state(
            StateBuilder::new(Player::Playing)
                .name(Player::Playing.name())
                .parent(Player::Active)
                .on_enter(|_, _, _, deck: &mut Deck| deck.spins += 1)
                .goto(Command::Pause, Player::Paused),
        )?
        .state(
            StateBuilder::new(Player::Paused)
                .name(Player::Paused.name())
                .parent(Player::Active)
                .goto(Command::Play, Player::Playing),
        )?
        .build()?;
    Ok(table)
}

fn press(
    machine: &mut Machine<'_, Deck, Position>,
    command: Command,
    payload: Position,
) -> Result<(), EngineError> {
    let outcome = machine.dispatch(command, &payload)?;
    let path: Vec<&str> = machine
        .active_path()
        .into_iter()
        .filter_map(|state| machine.table().name(state))
        .collect();
    println!(
        "{:>6}: {:<40} {}",
        command.name(),
        format!("{outcome:?}"),
        path.join(" > ")
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Media Player Example ===\n");

    let table = player()?;
    let mut machine = Machine::init(&table, Deck::default()).with_history();

    press(&mut machine, Command::Power, 0)?;
    // Stopped -> Playing goes through On, entering Active on the way.
    press(&mut machine, Command::Play, 0)?;
    press(&mut machine, Command::Seek, 95)?;
    press(&mut machine, Command::Pause, 0)?;
    // Seek is inherited from Active and keeps Paused active.
    press(&mut machine, Command::Seek, 120)?;

    println!("\nDeck: {:?}", machine.context());

    let checkpoint = machine.checkpoint();
    let json = checkpoint.to_json()?;
    println!("\nCheckpoint {}:\n{json}\n", checkpoint.id);

    let restored = Checkpoint::from_json(&json)?;
    let mut machine = Machine::resume(
        &table,
        Deck {
            position: 120,
            ..Deck::default()
        },
        &restored,
    )?;

    press(&mut machine, Command::Play, 0)?;
    press(&mut machine, Command::Stop, 0)?;
    press(&mut machine, Command::Power, 0)?;

    if let Some(history) = machine.history() {
        println!("\nHistory ({} transitions):", history.len());
        for record in history.transitions() {
            println!("  {} -> {} via {} ({})", record.from, record.to, record.event, record.kind);
        }
        let path: Vec<String> = history.get_path().iter().map(ToString::to_string).collect();
        println!("  path: {}", path.join(" -> "));
    }
    println!("\nDeck: {:?}", machine.context());

    Ok(())
}
