//! Club-champion decision logic.
//!
//! Pure functions; the Result Poster feeds them the pre-update rating
//! state of the winner's club mates and applies the verdict inside its
//! transaction.

/// A club mate of the winner, as read before the rating update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rival {
    pub playerid: i64,
    pub elo: i32,
}

/// The strongest other member of the club: highest elo, ties broken by
/// lowest playerid so the result is deterministic.
pub fn top_rival(rivals: &[Rival]) -> Option<Rival> {
    rivals
        .iter()
        .copied()
        .max_by(|a, b| a.elo.cmp(&b.elo).then(b.playerid.cmp(&a.playerid)))
}

/// Does the winner take the club-champion flag?
///
/// A club with no other members has no rival to beat, so the winner is
/// champion automatically. Otherwise the winner must match or exceed the
/// top rival's elo.
pub fn champion_verdict(winner_elo: i32, rival: Option<Rival>) -> bool {
    match rival {
        None => true,
        Some(r) => winner_elo >= r.elo,
    }
}
