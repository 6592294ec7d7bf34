use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use cyrum_presence::config::Config;
use cyrum_presence::presence::{Clock, FixedClock};
use cyrum_presence::store::{ChatState, Store};
use cyrum_presence::theme::ThemeContext;
use cyrum_presence::widgets::{ActivityLabel, ActivityLabelState, SectionHeader, SectionHeaderState};
use pretty_assertions::assert_eq;
use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::StatefulWidget};
use serde_json::json;

const ALICE: &str = "@alice:example.org";
const BOB: &str = "@bob:example.org";

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap()
}

fn row(buf: &Buffer, y: u16) -> String {
    (buf.area.x..buf.area.right())
        .map(|x| buf[(x, y)].symbol())
        .collect()
}

struct Screen {
    header: SectionHeaderState,
    alice: ActivityLabelState,
    bob: ActivityLabelState,
}

impl Screen {
    fn connect(store: &Store<ChatState>) -> Self {
        Self {
            header: SectionHeaderState::new(),
            alice: ActivityLabelState::connect(store, ALICE),
            bob: ActivityLabelState::connect(store, BOB),
        }
    }

    fn draw(&mut self, config: &Config, clock: &FixedClock) -> Buffer {
        let humanizer = config.humanizer().unwrap();
        let theme = config.theme().unwrap();
        let area = Rect::new(0, 0, 24, 3);
        let mut buf = Buffer::empty(area);

        ThemeContext::scoped(theme, || {
            StatefulWidget::render(
                SectionHeader::new("Members"),
                Rect::new(0, 0, 24, 1),
                &mut buf,
                &mut self.header,
            );
            ActivityLabel::new(ALICE).humanizer(&humanizer).clock(clock).render(
                Rect::new(0, 1, 24, 1),
                &mut buf,
                &mut self.alice,
            );
            ActivityLabel::new(BOB).humanizer(&humanizer).clock(clock).render(
                Rect::new(0, 2, 24, 1),
                &mut buf,
                &mut self.bob,
            );
        });

        buf
    }
}

#[test]
fn presence_events_drive_the_screen() {
    let config = Config::from_toml_str(
        r##"
        [presence]
        recent_threshold_secs = 120

        [theme]
        background_color = "#203040"
        text_color = "#f0f0f0"
        "##,
    )
    .unwrap();

    let clock = FixedClock::new(start());
    let store = Store::new(ChatState::default());
    let mut screen = Screen::connect(&store);

    store
        .update(|state| {
            state.apply_presence_event(
                ALICE,
                &json!({ "presence": "unavailable", "last_active_ago": 300_000 }),
                start(),
            )
        })
        .unwrap();

    let buf = screen.draw(&config, &clock);
    assert_eq!(row(&buf, 0), " Members                ");
    assert_eq!(row(&buf, 1), "Active 5 minutes ago    ");
    // No presence known for bob, so his row stays blank.
    assert_eq!(row(&buf, 2), " ".repeat(24));
    assert_eq!(buf[(0, 0)].bg, Color::Rgb(0x20, 0x30, 0x40));
    assert_eq!(buf[(0, 1)].fg, Color::Rgb(0xf0, 0xf0, 0xf0));
    assert!(!screen.alice.needs_redraw());
    assert!(!screen.bob.needs_redraw());

    // Time passing alone changes the text on the next draw.
    clock.advance(TimeDelta::hours(3));
    let buf = screen.draw(&config, &clock);
    assert_eq!(row(&buf, 1), "Active 3 hours ago      ");
    assert_eq!(screen.header.computations(), 1);

    // An event for bob only marks bob's label.
    store
        .update(|state| {
            state.apply_presence_event(
                BOB,
                &json!({ "presence": "online", "last_active_ago": 0, "currently_active": true }),
                clock.now(),
            )
        })
        .unwrap();
    assert!(!screen.alice.needs_redraw());
    assert!(screen.bob.needs_redraw());

    let buf = screen.draw(&config, &clock);
    assert_eq!(row(&buf, 2), "Active now              ");
}

#[test]
fn snapshot_loaded_from_json_renders_with_defaults() {
    let snapshot = json!({
        ALICE: { "status": "offline", "last_active": "2026-03-13T12:00:00Z" },
        BOB: { "status": "online", "last_active": "not a timestamp" },
    });
    let state: ChatState = ChatState::new(serde_json::from_value(snapshot).unwrap());
    let clock = FixedClock::new(start());
    let config = Config::default();

    let store = Store::new(state);
    let mut screen = Screen::connect(&store);
    let buf = screen.draw(&config, &clock);

    assert_eq!(row(&buf, 1), "Active yesterday        ");
    // A presence without a usable timestamp is not shown.
    assert_eq!(row(&buf, 2), " ".repeat(24));
}
