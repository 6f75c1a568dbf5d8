//! League/team hierarchical parallelism.
//!
//! A [`TeamPolicy`] launches `league_size` independent teams. Each team has
//! `team_size` members that share a barrier and split inner loops with
//! [`TeamMember::team_thread_range`]. Members of a team with more than one
//! thread run on scoped OS threads so the barrier cannot deadlock a pool
//! worker. Those threads are spawned once per lane, not once per league: at
//! most `concurrency / team_size` lanes run at a time and each walks a strided
//! share of the leagues.

use std::ops::Range;
use std::sync::Barrier;

use crate::{ExecError, ExecutionSpace, Result};

/// Shape of a team launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamPolicy {
    league_size: usize,
    team_size: usize,
}

impl TeamPolicy {
    pub fn new(league_size: usize, team_size: usize) -> Result<Self> {
        if team_size == 0 {
            return Err(ExecError::InvalidTeamSize);
        }
        Ok(Self {
            league_size,
            team_size,
        })
    }

    pub fn league_size(&self) -> usize {
        self.league_size
    }

    pub fn team_size(&self) -> usize {
        self.team_size
    }
}

/// Handle passed to each member of a team.
#[derive(Debug)]
pub struct TeamMember<'a> {
    league_rank: usize,
    league_size: usize,
    team_rank: usize,
    team_size: usize,
    barrier: &'a Barrier,
}

impl<'a> TeamMember<'a> {
    pub fn league_rank(&self) -> usize {
        self.league_rank
    }

    pub fn league_size(&self) -> usize {
        self.league_size
    }

    pub fn team_rank(&self) -> usize {
        self.team_rank
    }

    pub fn team_size(&self) -> usize {
        self.team_size
    }

    /// Block until every member of this team reaches the barrier.
    pub fn team_barrier(&self) {
        if self.team_size > 1 {
            self.barrier.wait();
        }
    }

    /// The part of `range` this member owns: a contiguous block, with
    /// earlier members taking the remainder one element at a time.
    pub fn team_range(&self, range: Range<usize>) -> Range<usize> {
        let n = range.len();
        let base = n / self.team_size;
        let rem = n % self.team_size;
        let r = self.team_rank;
        let start = range.start + r * base + r.min(rem);
        let len = base + usize::from(r < rem);
        start..start + len
    }

    /// Call `body(i)` for the indices of `range` owned by this member.
    ///
    /// Across the whole team every index is visited exactly once.
    pub fn team_thread_range<F: FnMut(usize)>(&self, range: Range<usize>, body: F) {
        self.team_range(range).for_each(body);
    }
}

/// Run `body` once per member of every team in `policy`.
///
/// The team size is capped at the space's concurrency. A launch spawns at
/// most `concurrency - lanes` extra OS threads however many leagues it has.
pub fn parallel_for_team<E, F>(exec: &E, policy: &TeamPolicy, body: F)
where
    E: ExecutionSpace,
    F: Fn(&TeamMember<'_>) + Sync + Send,
{
    let team_size = policy.team_size.min(exec.concurrency()).max(1);
    let league_size = policy.league_size;
    let lanes = (exec.concurrency() / team_size).clamp(1, league_size.max(1));
    tracing::trace!(league_size, team_size, lanes, space = E::NAME, "team launch");

    each_lane(exec, 0..lanes.min(league_size), &|lane| {
        let barrier = Barrier::new(team_size);
        let run_member = |team_rank| {
            for (k, league_rank) in (lane..league_size).step_by(lanes).enumerate() {
                // the previous league's barrier generation must drain first
                if k > 0 {
                    barrier.wait();
                }
                body(&TeamMember {
                    league_rank,
                    league_size,
                    team_rank,
                    team_size,
                    barrier: &barrier,
                });
            }
        };
        if team_size == 1 {
            run_member(0);
            return;
        }
        std::thread::scope(|s| {
            for team_rank in 1..team_size {
                let run = &run_member;
                s.spawn(move || run(team_rank));
            }
            run_member(0);
        });
    });
}

/// One task per lane. Lanes never outnumber the workers, so the split goes
/// all the way down instead of stopping at a minimum chunk length.
fn each_lane<E, F>(exec: &E, lanes: Range<usize>, f: &F)
where
    E: ExecutionSpace,
    F: Fn(usize) + Sync,
{
    if lanes.len() <= 1 {
        lanes.for_each(f);
        return;
    }
    let mid = lanes.start + lanes.len() / 2;
    exec.join(
        || each_lane(exec, lanes.start..mid, f),
        || each_lane(exec, mid..lanes.end, f),
    );
}
