//! The canonical seat map and its assignment algebra.
//!
//! `Positions` has no identity and owns no actor — it's a plain value type
//! with pure functions over it, the same way a room's lifecycle state
//! machine is a plain enum with pure transition methods. The Room Manager
//! is the only thing that ever holds a *mutable* `Positions`; everything
//! here just computes a new value.

use pidro_protocol::{PlayerId, Seat, SeatChoice, Team};

/// Total mapping `Seat -> Option<PlayerId>` — the single source of truth
/// for who is sitting where. `Option::None` reads as "empty" (⊥ in the
/// spec's notation).
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Positions {
    seats: [Option<PlayerId>; 4],
}

/// Why an `assign` was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssignError {
    #[error("room is full")]
    RoomFull,
    #[error("player is already seated")]
    AlreadySeated,
    #[error("seat is taken")]
    SeatTaken,
    #[error("team is full")]
    TeamFull,
    #[error("invalid seat choice")]
    InvalidChoice,
}

fn index_of(seat: Seat) -> usize {
    Seat::ALL.iter().position(|s| *s == seat).expect("Seat::ALL is exhaustive")
}

impl Positions {
    /// All four seats empty.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Seats with no occupant, canonical order.
    pub fn available(&self) -> Vec<Seat> {
        Seat::ALL.into_iter().filter(|s| self.get(*s).is_none()).collect()
    }

    /// Empty seats belonging to `team`, canonical order.
    pub fn team_available(&self, team: Team) -> Vec<Seat> {
        team.seats().into_iter().filter(|s| self.get(*s).is_none()).collect()
    }

    /// Occupant ids, canonical seat order, skipping empty seats.
    pub fn player_ids(&self) -> Vec<PlayerId> {
        Seat::ALL.into_iter().filter_map(|s| self.get(s).cloned()).collect()
    }

    /// Number of occupied seats.
    pub fn count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_some()).count()
    }

    pub fn has_player(&self, pid: &PlayerId) -> bool {
        self.get_seat(pid).is_some()
    }

    /// The seat `pid` occupies, if any.
    pub fn get_seat(&self, pid: &PlayerId) -> Option<Seat> {
        Seat::ALL.into_iter().find(|s| self.get(*s) == Some(pid))
    }

    /// The occupant of `seat`, if any.
    pub fn get(&self, seat: Seat) -> Option<&PlayerId> {
        self.seats[index_of(seat)].as_ref()
    }

    /// Attempts to seat `pid` per `choice`, returning the new map and the
    /// seat landed on. Pure: `self` is untouched, a new `Positions` is
    /// returned on success.
    ///
    /// Team choice lands on the first available seat of that team in
    /// canonical order; `Auto` lands on the first available seat overall.
    pub fn assign(&self, pid: PlayerId, choice: SeatChoice) -> Result<(Positions, Seat), AssignError> {
        if self.count() >= 4 {
            return Err(AssignError::RoomFull);
        }
        if self.has_player(&pid) {
            return Err(AssignError::AlreadySeated);
        }

        let seat = match choice {
            SeatChoice::Seat(seat) => {
                if self.get(seat).is_some() {
                    return Err(AssignError::SeatTaken);
                }
                seat
            }
            SeatChoice::Team(team) => {
                *self.team_available(team).first().ok_or(AssignError::TeamFull)?
            }
            SeatChoice::Auto => {
                *self.available().first().ok_or(AssignError::RoomFull)?
            }
        };

        let mut next = self.clone();
        next.seats[index_of(seat)] = Some(pid);
        Ok((next, seat))
    }

    /// Idempotent clear: if `pid` isn't seated, returns a clone unchanged.
    pub fn remove(&self, pid: &PlayerId) -> Positions {
        let mut next = self.clone();
        if let Some(seat) = self.get_seat(pid) {
            next.seats[index_of(seat)] = None;
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(s: &str) -> PlayerId {
        PlayerId::from(s)
    }

    #[test]
    fn empty_has_no_occupants() {
        let p = Positions::empty();
        assert_eq!(p.count(), 0);
        assert_eq!(p.available(), Seat::ALL.to_vec());
        assert!(p.player_ids().is_empty());
    }

    #[test]
    fn auto_assign_lands_canonical_order() {
        let p = Positions::empty();
        let (p, seat) = p.assign(pid("h"), SeatChoice::Auto).unwrap();
        assert_eq!(seat, Seat::N);
        let (p, seat) = p.assign(pid("p2"), SeatChoice::Auto).unwrap();
        assert_eq!(seat, Seat::E);
        let (_p, seat) = p.assign(pid("p3"), SeatChoice::Auto).unwrap();
        assert_eq!(seat, Seat::S);
    }

    #[test]
    fn explicit_seat_collision_is_rejected() {
        let p = Positions::empty();
        let (p, _) = p.assign(pid("h"), SeatChoice::Seat(Seat::N)).unwrap();
        let err = p.assign(pid("p2"), SeatChoice::Seat(Seat::N)).unwrap_err();
        assert_eq!(err, AssignError::SeatTaken);
    }

    #[test]
    fn team_choice_lands_on_team_seat() {
        let p = Positions::empty();
        let (p, _) = p.assign(pid("h"), SeatChoice::Seat(Seat::N)).unwrap();
        let (p, seat) = p.assign(pid("p2"), SeatChoice::Team(Team::NorthSouth)).unwrap();
        assert_eq!(seat, Seat::S);
        let err = p.assign(pid("p3"), SeatChoice::Team(Team::NorthSouth)).unwrap_err();
        assert_eq!(err, AssignError::TeamFull);
    }

    #[test]
    fn already_seated_player_cannot_be_assigned_again() {
        let p = Positions::empty();
        let (p, _) = p.assign(pid("h"), SeatChoice::Auto).unwrap();
        let err = p.assign(pid("h"), SeatChoice::Auto).unwrap_err();
        assert_eq!(err, AssignError::AlreadySeated);
    }

    #[test]
    fn room_full_rejects_fifth_assignment() {
        let mut p = Positions::empty();
        for (i, seat) in Seat::ALL.into_iter().enumerate() {
            let (next, s) = p.assign(pid(&format!("p{i}")), SeatChoice::Seat(seat)).unwrap();
            assert_eq!(s, seat);
            p = next;
        }
        let err = p.assign(pid("p5"), SeatChoice::Auto).unwrap_err();
        assert_eq!(err, AssignError::RoomFull);
    }

    #[test]
    fn remove_is_idempotent() {
        let p = Positions::empty();
        let (p, _) = p.assign(pid("h"), SeatChoice::Auto).unwrap();
        let cleared = p.remove(&pid("h"));
        assert_eq!(cleared.count(), 0);
        let cleared_again = cleared.remove(&pid("h"));
        assert_eq!(cleared_again, cleared);
    }

    #[test]
    fn assign_is_pure_original_unchanged() {
        let p = Positions::empty();
        let (next, _) = p.assign(pid("h"), SeatChoice::Auto).unwrap();
        assert_eq!(p.count(), 0);
        assert_eq!(next.count(), 1);
    }
}
