mod common;

use std::sync::Arc;
use std::time::Duration;

use chgk_session::catalog::{GameCatalog, Parser, SourceId};
use chgk_session::error::SessionError;
use chgk_session::session::{Direction, Intent, Phase, SessionController};
use chgk_session::timer::{AudioCue, END_OFFSET, TickOutcome, TimerService, TimerSlot, TokioScheduler};

use common::{CountingCue, DURATIONS, Harness};

#[test]
fn full_game_over_one_tournament_with_two_questions() {
    let mut h = Harness::new("cup", "two_questions.txt");
    let mut phases = vec![h.phase()];

    h.session
        .apply(Intent::SelectGame(SourceId::new("cup")))
        .unwrap();
    phases.push(h.phase());
    h.session.apply(Intent::SelectTournament(1)).unwrap();
    phases.push(h.phase());

    assert_eq!(h.run_out(), 3, "prepare counts down from 3");
    h.session.apply(Intent::Continue).unwrap();
    phases.push(h.phase());
    assert_eq!(h.session.current_question_index(), Some(1));

    assert_eq!(h.run_out(), 5, "read counts down from 5");
    h.session.apply(Intent::Continue).unwrap();
    phases.push(h.phase());
    assert_eq!(h.run_out(), 60, "answer counts down from 60");
    assert_eq!(h.cue.count(), 4, "cue rings on the last four values");

    h.session.apply(Intent::Continue).unwrap();
    phases.push(h.phase());
    assert!(h.session.time_over(), "right answer expires immediately");
    assert_eq!(h.session.timers().active_slot(), None);
    assert_eq!(h.session.current_question_index(), Some(1));

    h.session.apply(Intent::Continue).unwrap();
    phases.push(h.phase());
    assert_eq!(h.session.current_question_index(), Some(2));
    assert_eq!(h.run_out(), 5);

    h.session.apply(Intent::Continue).unwrap();
    phases.push(h.phase());
    assert_eq!(h.run_out(), 60);
    assert_eq!(h.cue.count(), 8);

    h.session.apply(Intent::Continue).unwrap();
    phases.push(h.phase());
    assert_eq!(h.session.current_question_index(), Some(2));

    let arms = h.clock.arm_count();
    h.session.apply(Intent::Continue).unwrap();
    phases.push(h.phase());
    assert_eq!(h.clock.arm_count(), arms, "game over starts no timer");
    assert_eq!(h.clock.armed(), None);
    assert_eq!(h.clock.overlapping_arms(), 0);

    assert_eq!(
        phases,
        vec![
            Phase::SelectGame,
            Phase::SelectTournament,
            Phase::Prepare,
            Phase::Read,
            Phase::Answer,
            Phase::RightAnswer,
            Phase::Read,
            Phase::Answer,
            Phase::RightAnswer,
            Phase::GameOver,
        ]
    );
}

#[test]
fn answer_reveal_shows_substituted_image_and_comment() {
    let mut h = Harness::new("cup", "two_questions.txt");
    h.session.select_game("cup").unwrap();
    h.session.select_tournament(1).unwrap();
    h.run_out();
    h.session.proceed().unwrap();
    h.session.navigate(Direction::Next).unwrap();

    let question = h.session.current_question().unwrap();
    assert!(!question.question.contains("(pic:"));
    assert!(
        question
            .question
            .contains("https://db.chgk.info/images/db/20150101.jpg")
    );
    assert_eq!(question.comment.as_deref(), Some("Александрийский."));
}

#[test]
fn continue_before_expiry_keeps_the_phase() {
    let mut h = Harness::new("cup", "two_questions.txt");
    h.session.select_game("cup").unwrap();
    h.session.select_tournament(1).unwrap();
    h.run_out();
    h.session.proceed().unwrap();

    let tick = h.clock.next_tick().unwrap();
    h.session.handle_tick(tick);
    assert_eq!(
        h.session.apply(Intent::Continue).unwrap_err(),
        SessionError::TimerRunning { phase: Phase::Read }
    );
    assert_eq!(h.phase(), Phase::Read);
    assert_eq!(h.session.timer_value(TimerSlot::Read), 4);
}

#[test]
fn reset_mid_answer_returns_to_game_selection() {
    let mut h = Harness::new("cup", "two_questions.txt");
    h.session.select_game("cup").unwrap();
    h.session.select_tournament(1).unwrap();
    h.run_out();
    h.session.proceed().unwrap();
    h.run_out();
    h.session.proceed().unwrap();
    let stale = h.clock.next_tick().unwrap();

    h.session.apply(Intent::Reset).unwrap();
    assert_eq!(h.phase(), Phase::SelectGame);
    assert_eq!(h.session.handle_tick(stale), TickOutcome::Ignored);
    assert_eq!(h.session.timer_value(TimerSlot::Answer), 60);

    h.session.select_game("cup").unwrap();
    assert_eq!(h.phase(), Phase::SelectTournament);
}

#[tokio::test(start_paused = true)]
async fn wall_clock_scheduler_drives_the_prepare_countdown() {
    let catalog = GameCatalog::new();
    catalog.insert(
        SourceId::new("cup"),
        Parser::default().parse(&common::fixture("two_questions.txt")),
    );
    let cue = Arc::new(CountingCue::default());
    let (scheduler, mut ticks) = TokioScheduler::new(Duration::from_secs(1));
    let timers = TimerService::new(
        DURATIONS,
        END_OFFSET,
        Box::new(scheduler),
        Arc::clone(&cue) as Arc<dyn AudioCue>,
    );
    let mut session = SessionController::new(Arc::new(catalog), timers, DURATIONS, true);

    session.select_game("cup").unwrap();
    session.select_tournament(1).unwrap();

    let mut outcomes = Vec::new();
    while !session.time_over() {
        let tick = ticks.recv().await.unwrap();
        outcomes.push(session.handle_tick(tick));
    }
    assert_eq!(
        outcomes,
        vec![
            TickOutcome::Running {
                slot: TimerSlot::Prepare,
                remaining: 2,
                cue: false
            },
            TickOutcome::Running {
                slot: TimerSlot::Prepare,
                remaining: 1,
                cue: false
            },
            TickOutcome::Expired {
                slot: TimerSlot::Prepare,
                cue: false
            },
        ]
    );

    session.proceed().unwrap();
    tokio::time::sleep(Duration::from_millis(2500)).await;
    while let Ok(tick) = ticks.try_recv() {
        session.handle_tick(tick);
    }
    assert_eq!(session.timer_value(TimerSlot::Read), 3);
    assert_eq!(cue.count(), 0);
}
