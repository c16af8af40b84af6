use anyhow::anyhow;
use crossterm::cursor::{DisableBlinking, EnableBlinking, SetCursorStyle};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture, Event,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use log::debug;
use rat_group_input::core::EditObserver;
use rat_group_input::event::{ct_event, HandleEvent, Regular, TextOutcome};
use rat_group_input::grouped_input::{GroupedInput, GroupedInputState};
use rat_group_input::GroupConfig;
use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Style, Stylize};
use ratatui::text::Line;
use ratatui::widgets::{Block, StatefulWidget, Widget};
use ratatui::Terminal;
use std::fs;
use std::io::stdout;
use std::path::PathBuf;
use std::time::Duration;

fn main() -> Result<(), anyhow::Error> {
    setup_logging()?;

    let mut state = State {
        focus: 0,
        card: GroupedInputState::with_config(GroupConfig::default()).with_max_len(19),
        date: GroupedInputState::with_config(
            GroupConfig::new('/', 2)?.show_delimiter_before_next_char(false),
        )
        .with_max_len(5),
        plain: GroupedInputState::with_config(GroupConfig::new('-', 0)?),
    };
    state.card.subscribe(Box::new(LogChanges("card")));
    state.date.subscribe(Box::new(LogChanges("date")));

    run_ui(&mut state)
}

struct State {
    focus: usize,
    card: GroupedInputState,
    date: GroupedInputState,
    plain: GroupedInputState,
}

struct LogChanges(&'static str);

impl EditObserver for LogChanges {
    fn after_change(&mut self, text: &str) {
        debug!("{}: {:?}", self.0, text);
    }
}

fn render(buf: &mut Buffer, area: Rect, state: &mut State) {
    let l = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Fill(1),
    ])
    .split(area);

    Line::from("Tab next field, Esc quit").black().on_cyan().render(l[0], buf);

    state.card.focused = state.focus == 0;
    state.date.focused = state.focus == 1;
    state.plain.focused = state.focus == 2;

    GroupedInput::new()
        .block(Block::bordered().title("card 4/-"))
        .delimiter_style(Style::new().dark_gray())
        .render(Rect::new(l[1].x, l[1].y, 25, 3), buf, &mut state.card);
    GroupedInput::new()
        .block(Block::bordered().title("date 2//"))
        .delimiter_style(Style::new().dark_gray())
        .render(Rect::new(l[2].x, l[2].y, 25, 3), buf, &mut state.date);
    GroupedInput::new()
        .block(Block::bordered().title("plain"))
        .render(Rect::new(l[3].x, l[3].y, 25, 3), buf, &mut state.plain);
}

fn focused(state: &mut State) -> &mut GroupedInputState {
    match state.focus {
        0 => &mut state.card,
        1 => &mut state.date,
        _ => &mut state.plain,
    }
}

fn run_ui(state: &mut State) -> Result<(), anyhow::Error> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    stdout().execute(EnableBlinking)?;
    stdout().execute(SetCursorStyle::BlinkingBar)?;
    stdout().execute(EnableBracketedPaste)?;

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    let r = 'l: loop {
        let frame = terminal.draw(|frame| {
            let area = frame.area();
            render(frame.buffer_mut(), area, state);
            if let Some((cx, cy)) = focused(state).screen_cursor() {
                frame.set_cursor_position((cx, cy));
            }
        });
        if let Err(e) = frame {
            break 'l Err(anyhow!(e));
        }

        match crossterm::event::poll(Duration::from_millis(10)) {
            Ok(true) => {
                let event = match crossterm::event::read() {
                    Ok(v) => v,
                    Err(e) => break 'l Err(anyhow!(e)),
                };
                match event {
                    ct_event!(keycode press Esc) => break 'l Ok(()),
                    ct_event!(keycode press Tab) => {
                        state.focus = (state.focus + 1) % 3;
                    }
                    Event::Mouse(_) => {
                        for s in [&mut state.card, &mut state.date, &mut state.plain] {
                            s.handle(&event, Regular);
                        }
                    }
                    _ => {
                        if focused(state).handle(&event, Regular) == TextOutcome::TextChanged {
                            debug!("text changed");
                        }
                    }
                }
            }
            Ok(false) => continue,
            Err(e) => break 'l Err(anyhow!(e)),
        }
    };

    disable_raw_mode()?;
    stdout().execute(DisableBracketedPaste)?;
    stdout().execute(SetCursorStyle::DefaultUserShape)?;
    stdout().execute(DisableBlinking)?;
    stdout().execute(DisableMouseCapture)?;
    stdout().execute(LeaveAlternateScreen)?;

    r
}

fn setup_logging() -> Result<(), anyhow::Error> {
    let log = PathBuf::from("grouped1.log");
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
