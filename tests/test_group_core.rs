use rat_group_input::core::{EditBuffer, EditObserver, EditPhase, GroupCore, LimitedString};
use rat_group_input::GroupConfig;
use std::cell::RefCell;
use std::rc::Rc;

/// Runs one edit through the core, the way a host does.
fn edit(core: &mut GroupCore, buf: &mut LimitedString, start: usize, count: usize, t: &str) {
    let after = t.chars().count();
    let text = buf.string();
    core.before_change(&text, start, count, after);
    buf.remove(start..start + count).expect("valid");
    buf.insert_str(start, t).expect("valid");
    let text = buf.string();
    core.changed(&text, start, count, after);
    core.after_change(buf).expect("valid");
}

fn type_str(core: &mut GroupCore, buf: &mut LimitedString, t: &str) -> Vec<String> {
    let mut res = Vec::new();
    for c in t.chars() {
        let len = buf.len();
        edit(core, buf, len, 0, &c.to_string());
        res.push(buf.string());
    }
    res
}

fn normalized(cfg: GroupConfig, t: &str) -> String {
    let mut core = GroupCore::new(cfg);
    let mut buf = LimitedString::new_text(t);
    core.normalize(&mut buf).expect("valid");
    buf.string()
}

#[test]
fn test_typing() {
    let mut core = GroupCore::default();
    let mut buf = LimitedString::new();

    let r = type_str(&mut core, &mut buf, "12345");
    assert_eq!(r, vec!["1", "12", "123", "1234", "1234-5"]);

    let r = type_str(&mut core, &mut buf, "678");
    assert_eq!(r, vec!["1234-56", "1234-567", "1234-5678"]);

    let r = type_str(&mut core, &mut buf, "9");
    assert_eq!(r, vec!["1234-5678-9"]);
}

#[test]
fn test_typing_after_group() {
    let cfg = GroupConfig::new('-', 3)
        .expect("valid")
        .show_delimiter_before_next_char(false);
    let mut core = GroupCore::new(cfg);
    let mut buf = LimitedString::new();

    let r = type_str(&mut core, &mut buf, "123456");
    assert_eq!(
        r,
        vec!["1", "12", "123-", "123-4", "123-45", "123-456-"]
    );
}

#[test]
fn test_backspace_delimiter() {
    let mut core = GroupCore::default();
    let mut buf = LimitedString::new_text("1234-5");

    // remove the '-'
    let text = buf.string();
    core.before_change(&text, 4, 1, 0);
    assert_eq!(core.backspace_before_delimiter_at(), Some(3));
    buf.remove(4..5).expect("valid");
    let text = buf.string();
    core.changed(&text, 4, 1, 0);
    core.after_change(&mut buf).expect("valid");

    assert_eq!(buf.as_str(), "1235");
    assert_eq!(core.backspace_before_delimiter_at(), None);
}

#[test]
fn test_backspace_data() {
    let mut core = GroupCore::default();
    let mut buf = LimitedString::new_text("1234-56");

    edit(&mut core, &mut buf, 6, 1, "");
    assert_eq!(buf.as_str(), "1234-5");
    edit(&mut core, &mut buf, 5, 1, "");
    assert_eq!(buf.as_str(), "1234");
    edit(&mut core, &mut buf, 3, 1, "");
    assert_eq!(buf.as_str(), "123");
}

#[test]
fn test_backspace_delimiter_at_start() {
    let mut core = GroupCore::default();
    let mut buf = LimitedString::new_text("-12");

    let text = buf.string();
    core.before_change(&text, 0, 1, 0);
    assert_eq!(core.backspace_before_delimiter_at(), None);
}

#[test]
fn test_no_pull_for_longer_deletes() {
    let mut core = GroupCore::default();
    let mut buf = LimitedString::new_text("1234-5678");

    // removes "-5"
    edit(&mut core, &mut buf, 4, 2, "");
    assert_eq!(buf.as_str(), "1234-678");

    // replace the '-' with a char
    let mut buf = LimitedString::new_text("1234-5678");
    edit(&mut core, &mut buf, 4, 1, "x");
    assert_eq!(buf.as_str(), "1234-x567-8");
}

#[test]
fn test_insert_middle() {
    let mut core = GroupCore::default();
    let mut buf = LimitedString::new_text("1234-5678");

    edit(&mut core, &mut buf, 2, 0, "x");
    assert_eq!(buf.as_str(), "12x3-4567-8");
}

#[test]
fn test_paste() {
    let mut core = GroupCore::default();
    let mut buf = LimitedString::new();

    edit(&mut core, &mut buf, 0, 0, "1-2-3-4-5-6-7-8-9");
    assert_eq!(buf.as_str(), "1234-5678-9");
}

#[test]
fn test_pass_through() {
    let cfg = GroupConfig::new('-', 0).expect("valid");
    assert_eq!(normalized(cfg, "123456789"), "123456789");
    assert_eq!(normalized(cfg, "12-34-56"), "123456");
}

#[test]
fn test_trailing_delimiter_at_max_len() {
    let cfg = GroupConfig::new('-', 4)
        .expect("valid")
        .show_delimiter_before_next_char(false);
    let mut core = GroupCore::new(cfg);

    // no room left
    let mut buf = LimitedString::new_text("1234").with_max_len(5);
    core.normalize(&mut buf).expect("valid");
    assert_eq!(buf.as_str(), "1234");

    // room for more
    let mut buf = LimitedString::new_text("1234").with_max_len(6);
    core.normalize(&mut buf).expect("valid");
    assert_eq!(buf.as_str(), "1234-");

    // no limit
    let mut buf = LimitedString::new_text("1234");
    core.normalize(&mut buf).expect("valid");
    assert_eq!(buf.as_str(), "1234-");
}

#[test]
fn test_trailing_delimiter_kept() {
    let cfg = GroupConfig::new('-', 4)
        .expect("valid")
        .show_delimiter_before_next_char(false)
        .remove_delimiter_in_last_position(false);
    let mut core = GroupCore::new(cfg);

    let mut buf = LimitedString::new_text("1234").with_max_len(5);
    core.normalize(&mut buf).expect("valid");
    assert_eq!(buf.as_str(), "1234-");
}

#[test]
fn test_trailing_delimiter_stripped() {
    let mut core = GroupCore::default();
    let mut buf = LimitedString::new_text("1234-").with_max_len(5);
    core.normalize(&mut buf).expect("valid");
    assert_eq!(buf.as_str(), "1234");
}

#[test]
fn test_overflow() {
    let mut core = GroupCore::default();

    // full text without delimiters
    let mut buf = LimitedString::new_text("123456789").with_max_len(9);
    core.normalize(&mut buf).expect("valid");
    assert_eq!(buf.as_str(), "1234-5678");

    // the cut leaves a trailing delimiter, which goes too.
    let mut buf = LimitedString::new_text("1234567890").with_max_len(10);
    core.normalize(&mut buf).expect("valid");
    assert_eq!(buf.as_str(), "1234-5678");

    let mut buf = LimitedString::new_text("12345").with_max_len(5);
    core.normalize(&mut buf).expect("valid");
    assert_eq!(buf.as_str(), "1234");
}

#[test]
fn test_multibyte() {
    let cfg = GroupConfig::new('·', 2).expect("valid");
    assert_eq!(normalized(cfg, "äöüß"), "äö·üß");
    assert_eq!(normalized(cfg, "ä·öü·ß"), "äö·üß");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Seen {
    Before(String, usize, usize, usize),
    Changed(String, usize, usize, usize),
    After(String),
}

struct Recorder(&'static str, Rc<RefCell<Vec<(&'static str, Seen)>>>);

impl EditObserver for Recorder {
    fn before_change(&mut self, text: &str, start: usize, count: usize, after: usize) {
        self.1
            .borrow_mut()
            .push((self.0, Seen::Before(text.into(), start, count, after)));
    }

    fn changed(&mut self, text: &str, start: usize, before: usize, count: usize) {
        self.1
            .borrow_mut()
            .push((self.0, Seen::Changed(text.into(), start, before, count)));
    }

    fn after_change(&mut self, text: &str) {
        self.1.borrow_mut().push((self.0, Seen::After(text.into())));
    }
}

#[test]
fn test_observers() {
    let seen = Rc::new(RefCell::new(Vec::new()));

    let mut core = GroupCore::default();
    let a = core.subscribe(Box::new(Recorder("a", seen.clone())));
    let _b = core.subscribe(Box::new(Recorder("b", seen.clone())));
    assert_eq!(core.observer_count(), 2);

    let mut buf = LimitedString::new_text("1234");
    edit(&mut core, &mut buf, 4, 0, "5");

    assert_eq!(
        *seen.borrow(),
        vec![
            ("a", Seen::Before("1234".into(), 4, 0, 1)),
            ("b", Seen::Before("1234".into(), 4, 0, 1)),
            ("a", Seen::Changed("12345".into(), 4, 0, 1)),
            ("b", Seen::Changed("12345".into(), 4, 0, 1)),
            ("a", Seen::After("1234-5".into())),
            ("b", Seen::After("1234-5".into())),
        ]
    );

    seen.borrow_mut().clear();
    assert!(core.unsubscribe(a).is_some());
    assert!(core.unsubscribe(a).is_none());
    assert_eq!(core.observer_count(), 1);

    edit(&mut core, &mut buf, 6, 0, "6");
    assert_eq!(
        *seen.borrow(),
        vec![
            ("b", Seen::Before("1234-5".into(), 6, 0, 1)),
            ("b", Seen::Changed("1234-56".into(), 6, 0, 1)),
            ("b", Seen::After("1234-56".into())),
        ]
    );
}

#[test]
fn test_phase() {
    let mut core = GroupCore::default();
    assert_eq!(core.phase(), EditPhase::Idle);

    let mut buf = LimitedString::new_text("12345");
    core.after_change(&mut buf).expect("valid");
    assert_eq!(core.phase(), EditPhase::Idle);
    assert_eq!(buf.as_str(), "1234-5");

    // the rewrite is not reported as an edit.
    let seen = Rc::new(RefCell::new(Vec::new()));
    core.subscribe(Box::new(Recorder("a", seen.clone())));
    edit(&mut core, &mut buf, 6, 0, "6");
    assert_eq!(core.phase(), EditPhase::Idle);
    assert_eq!(seen.borrow().len(), 3);
}
