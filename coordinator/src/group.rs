// group.rs - Process group membership and teardown
//
// Every member joins the group, learns its rank, and must tear the group
// down exactly once however it exits. Only rank 0 leads.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use log::{debug, error, info};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GroupError {
    #[error("invalid group membership: rank {rank} in a group of {size}")]
    InvalidMembership { rank: usize, size: usize },
    #[error("malformed launcher variable {var}={value:?}")]
    MalformedVariable { var: &'static str, value: String },
    #[error("launcher exported a {found} but no {missing}")]
    IncompleteLauncherEnv { found: &'static str, missing: &'static str },
    #[error("group member already initialized")]
    AlreadyInitialized,
    #[error("group member was never initialized")]
    NotInitialized,
    #[error("group member already finalized")]
    AlreadyFinalized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Leader,
    Follower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Membership {
    pub rank: usize,
    pub size: usize,
}

impl Membership {
    pub fn new(rank: usize, size: usize) -> Result<Self, GroupError> {
        if size == 0 || rank >= size {
            return Err(GroupError::InvalidMembership { rank, size });
        }
        Ok(Self { rank, size })
    }

    pub fn role(&self) -> Role {
        if self.rank == 0 { Role::Leader } else { Role::Follower }
    }
}

/// Transport that provides membership and teardown for one member.
pub trait GroupTransport {
    fn initialize(&mut self) -> Result<Membership, GroupError>;
    fn finalize(&mut self) -> Result<(), GroupError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Fresh,
    Joined,
    Finalized,
}

impl Phase {
    fn join(&mut self) -> Result<(), GroupError> {
        match *self {
            Phase::Fresh => { *self = Phase::Joined; Ok(()) }
            Phase::Joined => Err(GroupError::AlreadyInitialized),
            Phase::Finalized => Err(GroupError::AlreadyFinalized),
        }
    }

    fn leave(&mut self) -> Result<(), GroupError> {
        match *self {
            Phase::Joined => { *self = Phase::Finalized; Ok(()) }
            Phase::Fresh => Err(GroupError::NotInitialized),
            Phase::Finalized => Err(GroupError::AlreadyFinalized),
        }
    }
}

/// A joined member. Finalizes on `finalize` or, failing that, on drop.
pub struct GroupSession<T: GroupTransport> {
    transport: T,
    membership: Membership,
    finalized: bool,
}

impl<T: GroupTransport> GroupSession<T> {
    pub fn join(mut transport: T) -> Result<Self, GroupError> {
        let membership = transport.initialize()?;
        info!("joined group as rank {} of {}", membership.rank, membership.size);
        Ok(Self { transport, membership, finalized: false })
    }

    pub fn membership(&self) -> Membership {
        self.membership
    }

    pub fn role(&self) -> Role {
        self.membership.role()
    }

    pub fn finalize(mut self) -> Result<(), GroupError> {
        self.finalized = true;
        self.transport.finalize()?;
        debug!("rank {} left the group", self.membership.rank);
        Ok(())
    }
}

impl<T: GroupTransport> Drop for GroupSession<T> {
    fn drop(&mut self) {
        if self.finalized {
            return;
        }
        self.finalized = true;
        if let Err(err) = self.transport.finalize() {
            error!("rank {} failed to leave the group: {err}", self.membership.rank);
        }
    }
}

// --- Launcher-provided membership ---

const RANK_VARS: &[&str] = &["OMPI_COMM_WORLD_RANK", "PMI_RANK", "CONWAY_RANK"];
const SIZE_VARS: &[&str] = &["OMPI_COMM_WORLD_SIZE", "PMI_SIZE", "CONWAY_SIZE"];

/// Membership discovered from the variables a parallel job launcher exports.
/// Without any of them the process forms a group of one.
pub struct LauncherTransport {
    lookup: Box<dyn Fn(&str) -> Option<String> + Send>,
    phase: Phase,
}

impl LauncherTransport {
    pub fn from_env() -> Self {
        Self::with_lookup(|var| std::env::var(var).ok())
    }

    pub fn with_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + 'static,
    {
        Self { lookup: Box::new(lookup), phase: Phase::Fresh }
    }

    fn first_of(&self, vars: &'static [&'static str]) -> Result<Option<(&'static str, usize)>, GroupError> {
        for &var in vars {
            if let Some(value) = (self.lookup)(var) {
                let parsed = value
                    .trim()
                    .parse()
                    .map_err(|_| GroupError::MalformedVariable { var, value: value.clone() })?;
                return Ok(Some((var, parsed)));
            }
        }
        Ok(None)
    }
}

impl GroupTransport for LauncherTransport {
    fn initialize(&mut self) -> Result<Membership, GroupError> {
        let membership = match (self.first_of(RANK_VARS)?, self.first_of(SIZE_VARS)?) {
            (None, None) => Membership::new(0, 1)?,
            (Some((_, rank)), Some((_, size))) => Membership::new(rank, size)?,
            (Some((found, _)), None) => {
                return Err(GroupError::IncompleteLauncherEnv { found, missing: "group size" });
            }
            (None, Some((found, _))) => {
                return Err(GroupError::IncompleteLauncherEnv { found, missing: "rank" });
            }
        };
        self.phase.join()?;
        Ok(membership)
    }

    fn finalize(&mut self) -> Result<(), GroupError> {
        self.phase.leave()
    }
}

// --- In-process group ---

/// A group whose members are threads of this process. Teardown is a
/// barrier, so every member has to reach `finalize` for any of them to
/// get past it.
pub struct LocalGroup {
    size: usize,
    barrier: Arc<Barrier>,
    finalized: Arc<AtomicUsize>,
}

impl LocalGroup {
    pub fn new(size: usize) -> Result<Self, GroupError> {
        if size == 0 {
            return Err(GroupError::InvalidMembership { rank: 0, size });
        }
        Ok(Self {
            size,
            barrier: Arc::new(Barrier::new(size)),
            finalized: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn members(&self) -> Vec<LocalMember> {
        (0..self.size)
            .map(|rank| LocalMember {
                rank,
                size: self.size,
                barrier: Arc::clone(&self.barrier),
                finalized: Arc::clone(&self.finalized),
                phase: Phase::Fresh,
            })
            .collect()
    }

    /// Number of members that have completed teardown.
    pub fn finalized_count(&self) -> usize {
        self.finalized.load(Ordering::SeqCst)
    }

    /// Run `member_main` once per member, each on its own thread, and
    /// collect the results in rank order.
    pub fn run<F, T>(&self, member_main: F) -> Vec<thread::Result<T>>
    where
        F: Fn(LocalMember) -> T + Sync,
        T: Send,
    {
        let member_main = &member_main;
        thread::scope(|scope| {
            let handles: Vec<_> = self
                .members()
                .into_iter()
                .map(|member| scope.spawn(move || member_main(member)))
                .collect();
            handles.into_iter().map(|handle| handle.join()).collect()
        })
    }
}

pub struct LocalMember {
    rank: usize,
    size: usize,
    barrier: Arc<Barrier>,
    finalized: Arc<AtomicUsize>,
    phase: Phase,
}

impl LocalMember {
    pub fn rank(&self) -> usize {
        self.rank
    }
}

impl GroupTransport for LocalMember {
    fn initialize(&mut self) -> Result<Membership, GroupError> {
        self.phase.join()?;
        Membership::new(self.rank, self.size)
    }

    fn finalize(&mut self) -> Result<(), GroupError> {
        self.phase.leave()?;
        self.barrier.wait();
        self.finalized.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn launcher(vars: &[(&str, &str)]) -> LauncherTransport {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        LauncherTransport::with_lookup(move |var| vars.get(var).cloned())
    }

    #[test]
    fn rank_zero_leads() {
        assert_eq!(Membership::new(0, 4).unwrap().role(), Role::Leader);
        assert_eq!(Membership::new(3, 4).unwrap().role(), Role::Follower);
        assert!(Membership::new(4, 4).is_err());
        assert!(Membership::new(0, 0).is_err());
    }

    #[test]
    fn no_launcher_means_a_group_of_one() {
        let mut transport = launcher(&[]);
        assert_eq!(transport.initialize().unwrap(), Membership { rank: 0, size: 1 });
        transport.finalize().unwrap();
        assert!(matches!(transport.finalize(), Err(GroupError::AlreadyFinalized)));
    }

    #[test]
    fn launcher_variables_set_rank_and_size() {
        let mut transport = launcher(&[("PMI_RANK", "2"), ("PMI_SIZE", "3")]);
        assert_eq!(transport.initialize().unwrap(), Membership { rank: 2, size: 3 });
        assert!(matches!(transport.initialize(), Err(GroupError::AlreadyInitialized)));
    }

    #[test]
    fn broken_launcher_environment_is_fatal() {
        let mut malformed = launcher(&[("OMPI_COMM_WORLD_RANK", "zero"), ("OMPI_COMM_WORLD_SIZE", "2")]);
        assert!(matches!(malformed.initialize(), Err(GroupError::MalformedVariable { .. })));

        let mut partial = launcher(&[("CONWAY_RANK", "1")]);
        assert!(matches!(partial.initialize(), Err(GroupError::IncompleteLauncherEnv { .. })));

        let mut out_of_range = launcher(&[("CONWAY_RANK", "5"), ("CONWAY_SIZE", "2")]);
        assert!(matches!(out_of_range.initialize(), Err(GroupError::InvalidMembership { .. })));
    }

    #[test]
    fn finalize_before_initialize_is_an_error() {
        let mut transport = launcher(&[]);
        assert!(matches!(transport.finalize(), Err(GroupError::NotInitialized)));
    }

    #[test]
    fn dropped_session_still_tears_down() {
        let group = LocalGroup::new(2).unwrap();
        let results = group.run(|member| {
            let session = GroupSession::join(member).unwrap();
            if session.role() == Role::Leader {
                drop(session);
            } else {
                session.finalize().unwrap();
            }
        });
        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(group.finalized_count(), 2);
    }

    #[test]
    fn panicking_member_does_not_strand_its_peers() {
        let group = LocalGroup::new(3).unwrap();
        let results = group.run(|member| {
            let session = GroupSession::join(member).unwrap();
            if session.role() == Role::Leader {
                panic!("leader failed mid-run");
            }
            session.finalize().unwrap();
        });
        assert!(results[0].is_err());
        assert!(results[1..].iter().all(|r| r.is_ok()));
        assert_eq!(group.finalized_count(), 3);
    }
}
