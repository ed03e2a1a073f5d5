use log::debug;
use rat_mask::event::crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use rat_mask::event::ConsumedEvent;
use rat_mask::{FilterCategory, MaskConfig, MaskEditState, handle_events};
use std::fs;
use std::path::PathBuf;

fn main() -> Result<(), anyhow::Error> {
    setup_logging()?;

    let mut phone = MaskEditState::new().with_config(
        MaskConfig::new()
            .mask("(000) 000-0000")
            .filter(FilterCategory::DigitsOnly),
    )?;
    replay(
        "phone",
        &mut phone,
        &[
            key(KeyCode::Char('5')),
            key(KeyCode::Char('5')),
            key(KeyCode::Char('x')),
            key(KeyCode::Char('5')),
            Event::Paste("1234567".into()),
            key(KeyCode::Backspace),
            key(KeyCode::Char('8')),
        ],
    );
    println!("complete: {}", phone.is_complete());
    println!("plain: {}", phone.plain_text());

    let mut time = MaskEditState::new().with_mask("00:00")?;
    time.set_text("1200");
    replay(
        "time",
        &mut time,
        &[
            key(KeyCode::Insert),
            key(KeyCode::Char('0')),
            key(KeyCode::Char('9')),
            key(KeyCode::Char('3')),
            key(KeyCode::Char('0')),
            key(KeyCode::Delete),
        ],
    );

    // invalid masks leave the field alone.
    if let Err(e) = time.set_mask("00:00\\") {
        println!("rejected: {}", e);
    }
    time.set_placeholder('-')?;
    println!("time: {:?}", time.text());

    Ok(())
}

fn replay(name: &str, state: &mut MaskEditState, events: &[Event]) {
    for event in events {
        let r = handle_events(state, event);
        debug!("{} {:?} -> {:?}", name, event, r);
        let consumed = if r.is_consumed() { "" } else { " (host)" };
        println!(
            "{:>6}: {:<16} cursor {:>2} {:?}{}",
            name,
            format!("{:?}", state.text()),
            state.cursor(),
            r,
            consumed
        );
    }
}

fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn setup_logging() -> Result<(), anyhow::Error> {
    let log = PathBuf::from("mask_demo.log");
    if log.exists() {
        fs::remove_file(&log)?;
    }
    fern::Dispatch::new()
        .format(|out, message, _record| out.finish(format_args!("{}", message)))
        .level(log::LevelFilter::Debug)
        .chain(fern::log_file(&log)?)
        .apply()?;
    Ok(())
}
