//! Turn order, group assignment, and win detection.
//!
//! `Rules` is evaluated once per shot, when the table comes back to rest. The
//! checks run in a fixed precedence: eight-ball gone (win or loss), cue ball
//! scratched (foul), opening break (no assignment), then the normal
//! assignment and turn-continuation rule.

use serde::{Deserialize, Serialize};

use eightball_core::player::{BallGroup, Seat};

use crate::ball::{BallArena, GROUP_SIZE, OBJECT_BALLS};

/// Where the match is within the current shot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Table at rest, waiting for a shot.
    #[default]
    Aiming,
    /// At least one ball is moving.
    InMotion,
    /// Table just came to rest; the shot is being scored.
    Resolving,
}

/// Per-player rule state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub seat: Seat,
    pub turn: bool,
    /// Unset until the first group ball is legally pocketed.
    pub group: Option<BallGroup>,
    /// Balls of `group` on the table when this player's current shot began.
    pub prev_ball_count: usize,
}

impl PlayerState {
    fn new(seat: Seat, turn: bool) -> Self {
        Self {
            seat,
            turn,
            group: None,
            prev_ball_count: GROUP_SIZE,
        }
    }
}

/// Ball counts that drive the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCounts {
    pub solids: usize,
    pub stripes: usize,
    pub object_balls: usize,
    pub eight_on_table: bool,
}

impl TableCounts {
    pub fn of(arena: &BallArena) -> Self {
        Self {
            solids: arena.group_count(BallGroup::Solids),
            stripes: arena.group_count(BallGroup::Stripes),
            object_balls: arena.object_ball_count(),
            eight_on_table: arena.eight_on_table(),
        }
    }

    pub fn group(&self, group: BallGroup) -> usize {
        match group {
            BallGroup::Solids => self.solids,
            BallGroup::Stripes => self.stripes,
        }
    }
}

impl Default for TableCounts {
    fn default() -> Self {
        Self {
            solids: GROUP_SIZE,
            stripes: GROUP_SIZE,
            object_balls: OBJECT_BALLS,
            eight_on_table: true,
        }
    }
}

/// What happened to the table during a shot, as seen once it is at rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShotSummary {
    pub counts: TableCounts,
    pub scratched: bool,
}

/// Outcome of scoring one shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// The eight-ball is down; the match is over.
    Decided { winner: Seat },
    /// The cue ball dropped: respot it, turn passes.
    Foul { next: Seat },
    /// Nothing dropped on a full rack: turn passes, no groups assigned.
    BreakPass { next: Seat },
    /// Regular shot. `assigned` is set on the shot that fixed the groups.
    Played {
        shooter: Seat,
        assigned: Option<BallGroup>,
        kept_turn: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    pub players: [PlayerState; 2],
    /// Counts snapshotted when the current shot began.
    pub shot_start: TableCounts,
}

impl Default for Rules {
    fn default() -> Self {
        Self::new()
    }
}

impl Rules {
    /// Player one breaks.
    pub fn new() -> Self {
        Self {
            players: [
                PlayerState::new(Seat::One, true),
                PlayerState::new(Seat::Two, false),
            ],
            shot_start: TableCounts::default(),
        }
    }

    /// Player one to shoot, with `seat` already holding `group`.
    pub fn with_groups(seat: Seat, group: BallGroup) -> Self {
        let mut rules = Self::new();
        rules.assign(seat, group);
        rules
    }

    pub fn player(&self, seat: Seat) -> &PlayerState {
        &self.players[Self::slot(seat)]
    }

    fn player_mut(&mut self, seat: Seat) -> &mut PlayerState {
        &mut self.players[Self::slot(seat)]
    }

    fn slot(seat: Seat) -> usize {
        match seat {
            Seat::One => 0,
            Seat::Two => 1,
        }
    }

    /// Seat whose turn it is.
    pub fn shooter(&self) -> Seat {
        if self.players[0].turn {
            Seat::One
        } else {
            Seat::Two
        }
    }

    /// Group label for the HUD; empty until groups are assigned.
    pub fn group_label(&self, seat: Seat) -> &'static str {
        self.player(seat).group.map_or("", BallGroup::label)
    }

    /// Snapshot counts as the shooter strikes the cue ball.
    pub fn begin_shot(&mut self, counts: TableCounts) {
        self.shot_start = counts;
        for player in &mut self.players {
            if let Some(group) = player.group {
                player.prev_ball_count = counts.group(group);
            }
        }
    }

    /// Score the shot that just came to rest and update turn and groups.
    /// The caller respots the cue ball on `Verdict::Foul`.
    pub fn resolve_shot(&mut self, shot: ShotSummary) -> Verdict {
        let shooter = self.shooter();
        let counts = shot.counts;

        if !counts.eight_on_table {
            let own_cleared = self
                .player(shooter)
                .group
                .is_some_and(|g| counts.group(g) == 0);
            let winner = if own_cleared { shooter } else { shooter.other() };
            return Verdict::Decided { winner };
        }

        if shot.scratched {
            self.pass_turn();
            return Verdict::Foul {
                next: shooter.other(),
            };
        }

        if counts.object_balls == OBJECT_BALLS {
            self.pass_turn();
            return Verdict::BreakPass {
                next: shooter.other(),
            };
        }

        let mut assigned = None;
        if self.players.iter().all(|p| p.group.is_none()) {
            // If both groups dropped on the same shot, stripes wins the tie.
            if counts.solids < self.shot_start.solids {
                assigned = Some(BallGroup::Solids);
            }
            if counts.stripes < self.shot_start.stripes {
                assigned = Some(BallGroup::Stripes);
            }
            if let Some(group) = assigned {
                self.assign(shooter, group);
            }
        }

        let kept_turn = match self.player(shooter).group {
            Some(group) => self.player(shooter).prev_ball_count > counts.group(group),
            None => false,
        };
        if !kept_turn {
            self.pass_turn();
        }
        Verdict::Played {
            shooter,
            assigned,
            kept_turn,
        }
    }

    fn assign(&mut self, shooter: Seat, group: BallGroup) {
        let start = self.shot_start;
        let me = self.player_mut(shooter);
        me.group = Some(group);
        me.prev_ball_count = start.group(group);
        let them = self.player_mut(shooter.other());
        them.group = Some(group.other());
        them.prev_ball_count = start.group(group.other());
    }

    fn pass_turn(&mut self) {
        for player in &mut self.players {
            player.turn = !player.turn;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(solids: usize, stripes: usize, eight: bool) -> TableCounts {
        TableCounts {
            solids,
            stripes,
            object_balls: solids + stripes + usize::from(eight),
            eight_on_table: eight,
        }
    }

    fn played(rules: &mut Rules, start: TableCounts, end: TableCounts, scratched: bool) -> Verdict {
        rules.begin_shot(start);
        rules.resolve_shot(ShotSummary {
            counts: end,
            scratched,
        })
    }

    fn with_groups(p1: BallGroup) -> Rules {
        Rules::with_groups(Seat::One, p1)
    }

    #[test]
    fn player_one_breaks() {
        let rules = Rules::new();
        assert_eq!(rules.shooter(), Seat::One);
        assert!(rules.player(Seat::One).turn);
        assert!(!rules.player(Seat::Two).turn);
        assert_eq!(rules.group_label(Seat::One), "");
    }

    #[test]
    fn empty_break_passes_without_assignment() {
        let mut rules = Rules::new();
        let full = counts(7, 7, true);
        let v = played(&mut rules, full, full, false);
        assert_eq!(v, Verdict::BreakPass { next: Seat::Two });
        assert_eq!(rules.shooter(), Seat::Two);
        assert!(rules.players.iter().all(|p| p.group.is_none()));
    }

    #[test]
    fn first_solid_assigns_shooter_solids_and_keeps_turn() {
        let mut rules = Rules::new();
        let v = played(&mut rules, counts(7, 7, true), counts(6, 7, true), false);
        assert_eq!(
            v,
            Verdict::Played {
                shooter: Seat::One,
                assigned: Some(BallGroup::Solids),
                kept_turn: true
            }
        );
        assert_eq!(rules.player(Seat::One).group, Some(BallGroup::Solids));
        assert_eq!(rules.player(Seat::Two).group, Some(BallGroup::Stripes));
        assert_eq!(rules.shooter(), Seat::One);
        assert_eq!(rules.group_label(Seat::Two), "STRIPES");
    }

    #[test]
    fn second_player_first_stripe_gets_stripes() {
        let mut rules = Rules::new();
        let full = counts(7, 7, true);
        played(&mut rules, full, full, false);
        assert_eq!(rules.shooter(), Seat::Two);
        played(&mut rules, full, counts(7, 6, true), false);
        assert_eq!(rules.shooter(), Seat::Two);
        assert_eq!(rules.player(Seat::Two).group, Some(BallGroup::Stripes));
        assert_eq!(rules.player(Seat::One).group, Some(BallGroup::Solids));
    }

    #[test]
    fn both_groups_dropping_assigns_stripes() {
        let mut rules = Rules::new();
        played(&mut rules, counts(7, 7, true), counts(6, 6, true), false);
        assert_eq!(rules.player(Seat::One).group, Some(BallGroup::Stripes));
    }

    #[test]
    fn pocketing_own_ball_keeps_turn() {
        let mut rules = with_groups(BallGroup::Solids);
        played(&mut rules, counts(5, 6, true), counts(4, 6, true), false);
        assert_eq!(rules.shooter(), Seat::One);
        assert!(rules.player(Seat::One).turn);
    }

    #[test]
    fn pocketing_only_opponent_ball_passes_turn() {
        let mut rules = with_groups(BallGroup::Solids);
        let v = played(&mut rules, counts(5, 6, true), counts(5, 5, true), false);
        assert_eq!(
            v,
            Verdict::Played {
                shooter: Seat::One,
                assigned: None,
                kept_turn: false
            }
        );
        assert_eq!(rules.shooter(), Seat::Two);
    }

    #[test]
    fn miss_passes_turn() {
        let mut rules = with_groups(BallGroup::Stripes);
        played(&mut rules, counts(5, 6, true), counts(5, 6, true), false);
        assert_eq!(rules.shooter(), Seat::Two);
    }

    #[test]
    fn scratch_passes_turn_even_when_own_ball_dropped() {
        let mut rules = with_groups(BallGroup::Solids);
        let v = played(&mut rules, counts(5, 6, true), counts(4, 6, true), true);
        assert_eq!(v, Verdict::Foul { next: Seat::Two });
        assert_eq!(rules.shooter(), Seat::Two);
    }

    #[test]
    fn scratch_on_break_is_a_foul_not_a_break_pass() {
        let mut rules = Rules::new();
        let full = counts(7, 7, true);
        assert_eq!(
            played(&mut rules, full, full, true),
            Verdict::Foul { next: Seat::Two }
        );
    }

    #[test]
    fn eight_after_clearing_group_wins() {
        let mut rules = with_groups(BallGroup::Solids);
        let v = played(&mut rules, counts(0, 3, true), counts(0, 3, false), false);
        assert_eq!(v, Verdict::Decided { winner: Seat::One });
    }

    #[test]
    fn eight_with_own_balls_left_loses() {
        let mut rules = with_groups(BallGroup::Solids);
        let v = played(&mut rules, counts(2, 3, true), counts(2, 3, false), false);
        assert_eq!(v, Verdict::Decided { winner: Seat::Two });
    }

    #[test]
    fn eight_before_groups_assigned_loses() {
        let mut rules = Rules::new();
        let v = played(&mut rules, counts(7, 7, true), counts(7, 7, false), false);
        assert_eq!(v, Verdict::Decided { winner: Seat::Two });
    }

    #[test]
    fn eight_with_scratch_still_wins_when_group_cleared() {
        let mut rules = with_groups(BallGroup::Stripes);
        let v = played(&mut rules, counts(3, 0, true), counts(3, 0, false), true);
        assert_eq!(v, Verdict::Decided { winner: Seat::One });
    }

    #[test]
    fn groups_assigned_after_earlier_scratch_pocket() {
        let mut rules = Rules::new();
        // Player one scratches while dropping a solid: foul, no assignment.
        played(&mut rules, counts(7, 7, true), counts(6, 7, true), true);
        assert!(rules.players.iter().all(|p| p.group.is_none()));
        // Player two drops a solid on a clean shot and takes solids.
        played(&mut rules, counts(6, 7, true), counts(5, 7, true), false);
        assert_eq!(rules.shooter(), Seat::Two);
        assert_eq!(rules.player(Seat::Two).group, Some(BallGroup::Solids));
    }

    #[test]
    fn exactly_one_player_has_turn_throughout() {
        let mut rules = Rules::new();
        let shots = [
            (counts(7, 7, true), counts(7, 7, true), false),
            (counts(7, 7, true), counts(6, 7, true), false),
            (counts(6, 7, true), counts(6, 7, true), true),
            (counts(6, 7, true), counts(6, 5, true), false),
        ];
        for (start, end, scratched) in shots {
            played(&mut rules, start, end, scratched);
            assert_eq!(rules.players.iter().filter(|p| p.turn).count(), 1);
        }
    }
}
