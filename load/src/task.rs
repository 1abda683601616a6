//! Catalog of load tasks

use rand::Rng;
use rand::seq::SliceRandom;
use std::fmt;

/// One user-journey step a simulated user can perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LoadTask {
    /// `POST /users` with a fresh email, remembers the new id
    CreateUser,
    /// `GET /users/{id}` for the remembered user
    GetUser,
    /// `DELETE /users/{id}` for the remembered user
    DeleteUser,
    /// `POST /users/{id}/projects` with a fresh project
    AddExternalProject,
    /// `GET /users/{id}/projects`
    GetExternalProjects,
    /// `PUT /users/{id}` with new details
    UpdateUser,
}

impl LoadTask {
    /// Every task, each with equal weight
    pub const ALL: [Self; 6] = [
        Self::CreateUser,
        Self::GetUser,
        Self::DeleteUser,
        Self::AddExternalProject,
        Self::GetExternalProjects,
        Self::UpdateUser,
    ];

    /// Stable name used in logs, statistics and metric labels
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CreateUser => "create_user",
            Self::GetUser => "get_user",
            Self::DeleteUser => "delete_user",
            Self::AddExternalProject => "add_external_project",
            Self::GetExternalProjects => "get_external_projects",
            Self::UpdateUser => "update_user",
        }
    }

    /// The only status this task accepts
    #[must_use]
    pub const fn expected_status(self) -> u16 {
        match self {
            Self::CreateUser | Self::AddExternalProject => 201,
            Self::DeleteUser => 204,
            Self::GetUser | Self::GetExternalProjects | Self::UpdateUser => 200,
        }
    }

    /// Whether the task targets the remembered user and is skipped without one
    #[must_use]
    pub const fn needs_user(self) -> bool {
        !matches!(self, Self::CreateUser)
    }

    /// Pick a task uniformly at random
    pub fn choose<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *Self::ALL.choose(rng).unwrap_or(&Self::CreateUser)
    }
}

impl fmt::Display for LoadTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn test_expected_statuses() {
        assert_eq!(LoadTask::CreateUser.expected_status(), 201);
        assert_eq!(LoadTask::DeleteUser.expected_status(), 204);
        assert_eq!(LoadTask::UpdateUser.expected_status(), 200);
    }

    #[test]
    fn test_only_create_runs_without_user() {
        let independent: Vec<_> = LoadTask::ALL.iter().filter(|t| !t.needs_user()).collect();
        assert_eq!(independent, vec![&LoadTask::CreateUser]);
    }

    #[test]
    fn test_choose_reaches_every_task() {
        let mut rng = StdRng::seed_from_u64(42);
        let seen: HashSet<_> = (0..500).map(|_| LoadTask::choose(&mut rng)).collect();
        assert_eq!(seen.len(), LoadTask::ALL.len());
    }
}
