use std::fs;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use intervue::app::{Control, Tab};
use intervue::candidate::CandidateStatus;
use intervue::config::Config;
use intervue::runtime::{FixedTicker, InterviewEvent, Runner, TestEventSource};
use intervue::session::{Phase, NO_ANSWER_MARKER};
use intervue::App;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn key(code: KeyCode) -> InterviewEvent {
    InterviewEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn send_line(tx: &mpsc::Sender<InterviewEvent>, text: &str) {
    for c in text.chars() {
        tx.send(key(KeyCode::Char(c))).unwrap();
    }
    tx.send(key(KeyCode::Enter)).unwrap();
}

/// Feeds every queued event to the app, treating each tick as `tick` of wall time
fn drain(runner: &Runner<TestEventSource, FixedTicker>, app: &mut App, tick: Duration) -> Control {
    for _ in 0..10_000u32 {
        match runner.step() {
            InterviewEvent::Tick => return Control::Continue,
            InterviewEvent::Resize => {}
            InterviewEvent::Key(k) => {
                if app.on_key(k) == Control::Quit {
                    return Control::Quit;
                }
            }
        }
        app.on_tick(tick);
    }
    Control::Continue
}

// Resume without a phone number: one follow-up, then six questions answered by keyboard.
#[test]
fn headless_interview_flow_completes() {
    let dir = tempfile::tempdir().unwrap();
    let resume = dir.path().join("resume.md");
    fs::write(
        &resume,
        "Jane Doe\njane.doe@example.com\n\nFrontend engineer working with React and Node.",
    )
    .unwrap();

    let mut app = App::new(Config::default(), StdRng::seed_from_u64(42));
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    send_line(&tx, &resume.display().to_string());
    drain(&runner, &mut app, Duration::ZERO);
    assert_eq!(app.session.phase(), Phase::CollectingInfo);
    let asked = &app.session.transcript().last().unwrap().text;
    assert!(asked.contains("Phone"), "unexpected prompt: {asked}");

    send_line(&tx, "555-123-4567");
    drain(&runner, &mut app, Duration::ZERO);
    assert!(app.session.is_active());
    assert_eq!(app.session.question_index(), 0);
    assert!(app
        .session
        .transcript()
        .last()
        .unwrap()
        .text
        .starts_with("Question 1/6 - EASY"));

    let answer = "A component is a reusable function that renders UI; with async data \
                  from an api I keep state in hooks and handle the promise carefully.";
    for _ in 0..6 {
        send_line(&tx, answer);
    }
    drain(&runner, &mut app, Duration::ZERO);

    assert_eq!(app.session.phase(), Phase::Completed);
    let candidate = &app.store.all()[0];
    assert_eq!(candidate.status, CandidateStatus::Completed);
    assert_eq!(candidate.phone, "555-123-4567");
    assert_eq!(candidate.answered_count(), 6);
    assert!(candidate.final_score > 5.0);
    assert!(candidate.summary.contains("Overall Performance"));

    tx.send(key(KeyCode::Tab)).unwrap();
    drain(&runner, &mut app, Duration::ZERO);
    assert_eq!(app.tab, Tab::Interviewer);
    assert_eq!(app.visible_candidates().len(), 1);

    tx.send(key(KeyCode::Esc)).unwrap();
    assert_eq!(drain(&runner, &mut app, Duration::ZERO), Control::Quit);
}

// Nobody types: every question times out and is recorded with the marker.
#[test]
fn headless_all_questions_time_out() {
    let dir = tempfile::tempdir().unwrap();
    let resume = dir.path().join("resume.txt");
    fs::write(&resume, "John Smith\njohn@example.com\n(555) 987-6543\n").unwrap();

    let mut app = App::new(Config::default(), StdRng::seed_from_u64(7));
    app.submit_resume_path(&resume.display().to_string());
    assert!(app.session.is_active());

    let (_tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );

    // each tick stands for ten seconds of wall time
    for _ in 0..100u32 {
        if let InterviewEvent::Tick = runner.step() {
            app.on_tick(Duration::from_secs(10));
        }
        if app.session.phase() == Phase::Completed {
            break;
        }
    }

    assert_eq!(app.session.phase(), Phase::Completed);
    let candidate = &app.store.all()[0];
    assert!(candidate
        .questions
        .iter()
        .all(|q| q.answer.as_deref() == Some(NO_ANSWER_MARKER)));
    assert!(candidate
        .questions
        .iter()
        .all(|q| q.elapsed_secs == Some(q.time_limit_secs)));
    // floor point times the difficulty multiplier: 1.0, 1.0, 1.2, 1.2, 1.5, 1.5
    assert_eq!(candidate.final_score, 1.2);
}

#[test]
fn headless_bad_resume_keeps_idle() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = App::new(Config::default(), StdRng::seed_from_u64(1));
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    send_line(&tx, &dir.path().join("missing.pdf").display().to_string());
    drain(&runner, &mut app, Duration::ZERO);

    assert_eq!(app.session.phase(), Phase::Idle);
    assert!(app.store.is_empty());
    assert!(app
        .session
        .transcript()
        .last()
        .unwrap()
        .text
        .starts_with("Could not read resume"));
}
