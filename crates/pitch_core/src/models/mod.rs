//! Entity model: players, teams, ball, events and the match state.

pub mod ball;
pub mod events;
pub mod match_state;
pub mod player;
pub mod team;

pub use ball::Ball;
pub use events::{EventKind, EventLog, MatchEvent};
pub use match_state::{MatchState, PassLink, Termination};
pub use player::{Card, CardType, Player, PlayerId, PlayerStats, Role, Stat};
pub use team::{Team, TeamSide, TeamStats};
