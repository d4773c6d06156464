//! End-to-end tests against the running Room Manager actor: seating,
//! auto-start on the fourth join, disconnect/replace/reconnect timing,
//! and practice rooms.

use std::collections::HashMap;
use std::time::Duration;

use pidro_engine::{Outcome, Phase, RulesEngine, Viewer};
use pidro_protocol::{PlayerId, RoomFilter, RoomStatus, RoomType, Seat, SeatChoice};
use pidro_room::{RoomError, RoomManagerConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    Bid(i32),
    Pass,
}

impl pidro_bots::BidAction for Action {
    fn bid_amount(&self) -> Option<i32> {
        match self {
            Action::Bid(n) => Some(*n),
            Action::Pass => None,
        }
    }

    fn is_pass(&self) -> bool {
        matches!(self, Action::Pass)
    }
}

#[derive(Clone, Debug)]
struct StubState {
    players: [PlayerId; 4],
}

struct StubEngine;

impl RulesEngine for StubEngine {
    type State = StubState;
    type Action = Action;
    type Rejection = String;

    fn initial_state(players: [PlayerId; 4]) -> Self::State {
        StubState { players }
    }

    fn legal_actions(_state: &Self::State, _seat: Seat) -> Vec<Self::Action> {
        vec![Action::Bid(1), Action::Pass]
    }

    fn apply_action(state: &Self::State, _seat: Seat, _action: Self::Action) -> Result<Self::State, Self::Rejection> {
        Ok(state.clone())
    }

    fn phase(_state: &Self::State) -> Phase {
        Phase::InProgress
    }

    fn current_turn(_state: &Self::State) -> Option<Seat> {
        Some(Seat::N)
    }

    fn winner(_state: &Self::State) -> Outcome {
        Outcome::default()
    }

    fn mask_state_for(state: &Self::State, _viewer: Viewer) -> Self::State {
        state.clone()
    }
}

/// Gives the Room Manager actor a chance to drain an internal message (a
/// fired timer, a forwarded game-over) queued by the time advance that
/// just happened, before the next command is sent on a different channel.
async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

fn short_config() -> RoomManagerConfig {
    RoomManagerConfig {
        bot_replace_grace: Duration::from_secs(10),
        removal_grace: Duration::from_secs(120),
        channel_size: 64,
        bot_action_delay: Duration::from_millis(1),
    }
}

#[tokio::test]
async fn auto_start_on_fourth_join() {
    let rooms = pidro_room::spawn::<StubEngine>(short_config());

    let room = rooms.create_room(PlayerId::from("host"), RoomType::Public, HashMap::new()).await.unwrap();
    assert_eq!(room.status, RoomStatus::Waiting);
    assert_eq!(room.seats[Seat::N as usize], Some(PlayerId::from("host")));

    rooms.join_room(room.code, PlayerId::from("p2"), SeatChoice::Auto).await.unwrap();
    rooms.join_room(room.code, PlayerId::from("p3"), SeatChoice::Auto).await.unwrap();
    let (full, _seat) = rooms.join_room(room.code, PlayerId::from("p4"), SeatChoice::Auto).await.unwrap();

    assert_eq!(full.status, RoomStatus::Playing);
    assert!(rooms.game_handle(room.code).await.is_ok(), "a Game Coordinator must exist once the room is full");
}

#[tokio::test]
async fn explicit_seat_collision_then_team_fallback() {
    let rooms = pidro_room::spawn::<StubEngine>(short_config());
    let room = rooms.create_room(PlayerId::from("host"), RoomType::Public, HashMap::new()).await.unwrap();

    let err = rooms.join_room(room.code, PlayerId::from("p2"), SeatChoice::Seat(Seat::N)).await.unwrap_err();
    assert!(matches!(err, RoomError::SeatTaken(_, Seat::N)), "seat N is already taken by the host");

    let (room2, seat) =
        rooms.join_room(room.code, PlayerId::from("p2"), SeatChoice::Team(pidro_protocol::Team::NorthSouth)).await.unwrap();
    assert_eq!(seat, Seat::S);
    assert_eq!(room2.seats[Seat::S as usize], Some(PlayerId::from("p2")));
}

#[tokio::test]
async fn leave_room_frees_the_seat() {
    let rooms = pidro_room::spawn::<StubEngine>(short_config());
    let room = rooms.create_room(PlayerId::from("host"), RoomType::Public, HashMap::new()).await.unwrap();
    rooms.join_room(room.code, PlayerId::from("p2"), SeatChoice::Auto).await.unwrap();

    rooms.leave_room(room.code, PlayerId::from("p2")).await.unwrap();

    let info = rooms.get_room(room.code).await.unwrap();
    assert_eq!(info.seats[Seat::E as usize], None);
}

#[tokio::test]
async fn host_leaving_a_non_playing_room_closes_it() {
    let rooms = pidro_room::spawn::<StubEngine>(short_config());
    let room = rooms.create_room(PlayerId::from("host"), RoomType::Public, HashMap::new()).await.unwrap();

    rooms.leave_room(room.code, PlayerId::from("host")).await.unwrap();

    let err = rooms.get_room(room.code).await.unwrap_err();
    assert!(matches!(err, RoomError::NotFound(_)));
}

#[tokio::test]
async fn practice_room_is_excluded_from_the_public_lobby_and_starts_full() {
    let rooms = pidro_room::spawn::<StubEngine>(short_config());
    let room = rooms.create_room(PlayerId::from("host"), RoomType::Practice, HashMap::new()).await.unwrap();

    assert_eq!(room.status, RoomStatus::Playing, "practice rooms fill and start synchronously at creation");
    assert_eq!(room.bot_seats.len(), 3);

    let available = rooms.list_rooms(RoomFilter::Available).await;
    assert!(available.iter().all(|r| r.code != room.code), "practice rooms must not appear in the public lobby");
}

#[tokio::test(start_paused = true)]
async fn disconnect_during_play_is_replaced_by_a_bot_after_the_grace_window() {
    let rooms = pidro_room::spawn::<StubEngine>(short_config());
    let room = rooms.create_room(PlayerId::from("a"), RoomType::Public, HashMap::new()).await.unwrap();
    rooms.join_room(room.code, PlayerId::from("b"), SeatChoice::Auto).await.unwrap();
    rooms.join_room(room.code, PlayerId::from("c"), SeatChoice::Auto).await.unwrap();
    let (playing, _) = rooms.join_room(room.code, PlayerId::from("d"), SeatChoice::Auto).await.unwrap();
    assert_eq!(playing.status, RoomStatus::Playing);

    rooms.handle_disconnect(room.code, PlayerId::from("b")).await.unwrap();

    tokio::time::advance(Duration::from_millis(9_900)).await;
    let still_human = rooms.get_room(room.code).await.unwrap();
    assert_eq!(still_human.seats[Seat::E as usize], Some(PlayerId::from("b")), "no bot before the grace window elapses");

    tokio::time::advance(Duration::from_millis(300)).await;
    settle().await;
    let replaced = rooms.get_room(room.code).await.unwrap();
    assert_eq!(replaced.seats[Seat::E as usize], Some(PlayerId::bot(&room.code, Seat::E)));
    assert!(replaced.bot_seats.contains(&Seat::E));
}

#[tokio::test(start_paused = true)]
async fn reconnect_within_grace_cancels_the_replacement_timer() {
    let rooms = pidro_room::spawn::<StubEngine>(short_config());
    let room = rooms.create_room(PlayerId::from("a"), RoomType::Public, HashMap::new()).await.unwrap();
    rooms.join_room(room.code, PlayerId::from("b"), SeatChoice::Auto).await.unwrap();
    rooms.join_room(room.code, PlayerId::from("c"), SeatChoice::Auto).await.unwrap();
    rooms.join_room(room.code, PlayerId::from("d"), SeatChoice::Auto).await.unwrap();

    rooms.handle_disconnect(room.code, PlayerId::from("b")).await.unwrap();
    tokio::time::advance(Duration::from_secs(5)).await;

    let reconnected = rooms.handle_reconnect(room.code, PlayerId::from("b")).await.unwrap();
    assert_eq!(reconnected.seats[Seat::E as usize], Some(PlayerId::from("b")));

    tokio::time::advance(Duration::from_secs(30)).await;
    settle().await;
    let info = rooms.get_room(room.code).await.unwrap();
    assert_eq!(info.seats[Seat::E as usize], Some(PlayerId::from("b")), "no bot should ever have been seated");
    assert!(!info.bot_seats.contains(&Seat::E));
}

#[tokio::test(start_paused = true)]
async fn reclaiming_a_bot_replaced_seat_restores_the_original_occupant() {
    let rooms = pidro_room::spawn::<StubEngine>(short_config());
    let room = rooms.create_room(PlayerId::from("a"), RoomType::Public, HashMap::new()).await.unwrap();
    rooms.join_room(room.code, PlayerId::from("b"), SeatChoice::Auto).await.unwrap();
    rooms.join_room(room.code, PlayerId::from("c"), SeatChoice::Auto).await.unwrap();
    rooms.join_room(room.code, PlayerId::from("d"), SeatChoice::Auto).await.unwrap();

    rooms.handle_disconnect(room.code, PlayerId::from("b")).await.unwrap();
    tokio::time::advance(Duration::from_secs(11)).await;
    settle().await;

    let replaced = rooms.get_room(room.code).await.unwrap();
    assert!(replaced.bot_seats.contains(&Seat::E));

    let reclaimed = rooms.handle_reconnect(room.code, PlayerId::from("b")).await.unwrap();
    assert_eq!(reclaimed.seats[Seat::E as usize], Some(PlayerId::from("b")));
    assert!(!reclaimed.bot_seats.contains(&Seat::E));
}

#[tokio::test]
async fn bot_replacement_never_happens_outside_a_playing_room() {
    let rooms = pidro_room::spawn::<StubEngine>(short_config());
    let room = rooms.create_room(PlayerId::from("a"), RoomType::Public, HashMap::new()).await.unwrap();
    rooms.join_room(room.code, PlayerId::from("b"), SeatChoice::Auto).await.unwrap();

    rooms.handle_disconnect(room.code, PlayerId::from("b")).await.unwrap();

    let info = rooms.get_room(room.code).await.unwrap();
    assert_eq!(info.status, RoomStatus::Waiting);
    assert!(info.bot_seats.is_empty(), "a waiting room uses the long removal grace, never the short replace grace");
}

#[tokio::test]
async fn a_player_cannot_create_a_second_room_while_seated_in_one() {
    let rooms = pidro_room::spawn::<StubEngine>(short_config());
    let host = PlayerId::from("host");
    rooms.create_room(host.clone(), RoomType::Public, HashMap::new()).await.unwrap();

    let err = rooms.create_room(host, RoomType::Public, HashMap::new()).await.unwrap_err();
    assert!(matches!(err, RoomError::AlreadyInOtherRoom(_, _)));
}

#[tokio::test]
async fn a_player_cannot_join_a_second_room_while_seated_in_one() {
    let rooms = pidro_room::spawn::<StubEngine>(short_config());
    let first = rooms.create_room(PlayerId::from("host"), RoomType::Public, HashMap::new()).await.unwrap();
    let second = rooms.create_room(PlayerId::from("other-host"), RoomType::Public, HashMap::new()).await.unwrap();
    rooms.join_room(first.code, PlayerId::from("p2"), SeatChoice::Auto).await.unwrap();

    let err = rooms.join_room(second.code, PlayerId::from("p2"), SeatChoice::Auto).await.unwrap_err();
    assert!(matches!(err, RoomError::AlreadyInOtherRoom(_, code) if code == first.code));
}

#[tokio::test]
async fn leaving_a_room_frees_the_player_to_join_another() {
    let rooms = pidro_room::spawn::<StubEngine>(short_config());
    let first = rooms.create_room(PlayerId::from("host"), RoomType::Public, HashMap::new()).await.unwrap();
    let second = rooms.create_room(PlayerId::from("other-host"), RoomType::Public, HashMap::new()).await.unwrap();
    rooms.join_room(first.code, PlayerId::from("p2"), SeatChoice::Auto).await.unwrap();

    rooms.leave_room(first.code, PlayerId::from("p2")).await.unwrap();

    rooms.join_room(second.code, PlayerId::from("p2"), SeatChoice::Auto).await.unwrap();
}

#[tokio::test]
async fn closing_a_room_frees_every_seated_player() {
    let rooms = pidro_room::spawn::<StubEngine>(short_config());
    let room = rooms.create_room(PlayerId::from("host"), RoomType::Public, HashMap::new()).await.unwrap();
    rooms.join_room(room.code, PlayerId::from("p2"), SeatChoice::Auto).await.unwrap();

    rooms.close_room(room.code).await.unwrap();

    let reopened = rooms.create_room(PlayerId::from("p2"), RoomType::Public, HashMap::new()).await;
    assert!(reopened.is_ok(), "closing a room must release every player it held, not just the host");
}

#[tokio::test]
async fn team_full_is_reported_distinctly_from_seat_taken() {
    let rooms = pidro_room::spawn::<StubEngine>(short_config());
    let room = rooms.create_room(PlayerId::from("host"), RoomType::Public, HashMap::new()).await.unwrap();
    rooms
        .join_room(room.code, PlayerId::from("p2"), SeatChoice::Seat(Seat::S))
        .await
        .unwrap();

    let err = rooms
        .join_room(room.code, PlayerId::from("p3"), SeatChoice::Team(pidro_protocol::Team::NorthSouth))
        .await
        .unwrap_err();
    assert!(matches!(err, RoomError::TeamFull(_)));
}
