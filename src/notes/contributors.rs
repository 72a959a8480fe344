//! Contributor bookkeeping: the deduplicated contributor set, the compact
//! `login:Full Name` team notation and the layered merge of contributor sources.

use crate::core::error::{HeraldError, HeraldResult};
use crate::core::config::TeamConfig;
use crate::notes::model::Contributor;
use std::collections::{BTreeMap, HashMap, HashSet};

const PROFILE_URL_PREFIX: &str = "http://github.com/";

/// Deduplicated, contribution-sorted set of contributors
///
/// Three views are kept in lockstep: a uniqueness set, a sorted list for
/// output and a lookup by name. A structurally equal duplicate touches none
/// of them.
#[derive(Debug, Clone, Default)]
pub struct ContributorSet {
  unique: HashSet<Contributor>,
  sorted: Vec<Contributor>,
  by_name: HashMap<String, Contributor>,
}

impl ContributorSet {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add a contributor, returns false if it was already present
  pub fn add(&mut self, contributor: Contributor) -> bool {
    if !self.unique.insert(contributor.clone()) {
      return false;
    }

    // Insert after every contributor with at least as many contributions,
    // which keeps ties in insertion order.
    let position = self
      .sorted
      .iter()
      .position(|c| c.number_of_contributions < contributor.number_of_contributions)
      .unwrap_or(self.sorted.len());
    self.sorted.insert(position, contributor.clone());
    self.by_name.insert(contributor.name.clone(), contributor);
    true
  }

  pub fn add_all<I>(&mut self, contributors: I)
  where
    I: IntoIterator<Item = Contributor>,
  {
    for contributor in contributors {
      self.add(contributor);
    }
  }

  pub fn len(&self) -> usize {
    self.unique.len()
  }

  pub fn is_empty(&self) -> bool {
    self.unique.is_empty()
  }

  /// Contributors by descending number of contributions
  pub fn all_sorted(&self) -> &[Contributor] {
    &self.sorted
  }

  pub fn find_by_name(&self, name: &str) -> Option<&Contributor> {
    self.by_name.get(name)
  }

  /// `login:displayName` per contributor, in sorted order
  pub fn to_compact_notation(&self) -> Vec<String> {
    self
      .sorted
      .iter()
      .map(|c| format!("{}:{}", c.login, c.display_name()))
      .collect()
  }
}

impl FromIterator<Contributor> for ContributorSet {
  fn from_iter<I: IntoIterator<Item = Contributor>>(iter: I) -> Self {
    let mut set = ContributorSet::new();
    set.add_all(iter);
    set
  }
}

/// A configured team member, `login:Full Name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamMember {
  pub login: String,
  pub name: String,
}

impl TeamMember {
  pub fn parse(notation: &str) -> HeraldResult<Self> {
    let (login, name) = notation.split_once(':').ok_or_else(|| {
      HeraldError::with_help(
        format!("Invalid team member '{}'", notation),
        "Use the 'login:Full Name' notation, e.g. 'octocat:Mona Lisa'",
      )
    })?;
    let (login, name) = (login.trim(), name.trim());
    if login.is_empty() || name.is_empty() {
      return Err(HeraldError::with_help(
        format!("Invalid team member '{}': login and name are both required", notation),
        "Use the 'login:Full Name' notation, e.g. 'octocat:Mona Lisa'",
      ));
    }
    Ok(Self {
      login: login.to_string(),
      name: name.to_string(),
    })
  }

  pub fn to_contributor(&self) -> Contributor {
    Contributor::new(
      self.name.clone(),
      self.login.clone(),
      format!("{}{}", PROFILE_URL_PREFIX, self.login),
      0,
    )
  }
}

/// Contributors keyed by display name, as matched against commit authors
pub type ContributorMap = BTreeMap<String, Contributor>;

/// Merge the contributor layers, later layers overwrite same-named entries:
/// configured contributors, then GitHub contributors, then configured developers.
pub fn merge_contributors(
  configured_contributors: &[String],
  github_contributors: &ContributorSet,
  developers: &[String],
) -> HeraldResult<ContributorMap> {
  let mut out = ContributorMap::new();
  for notation in configured_contributors {
    let member = TeamMember::parse(notation)?;
    out.insert(member.name.clone(), member.to_contributor());
  }
  for contributor in github_contributors.all_sorted() {
    out.insert(contributor.name.clone(), contributor.clone());
  }
  for notation in developers {
    let member = TeamMember::parse(notation)?;
    out.insert(member.name.clone(), member.to_contributor());
  }
  Ok(out)
}

/// The GitHub layer of the merge. Explicitly configured contributors replace
/// it entirely, so `read_cached` is only called when none are configured.
pub fn github_layer<F>(team: &TeamConfig, read_cached: F) -> HeraldResult<ContributorSet>
where
  F: FnOnce() -> HeraldResult<ContributorSet>,
{
  if team.contributors.is_empty() {
    read_cached()
  } else {
    Ok(ContributorSet::new())
  }
}

/// Merged contributor map for a team config and a (lazily read) GitHub layer
pub fn contributors_for_team<F>(team: &TeamConfig, read_cached: F) -> HeraldResult<ContributorMap>
where
  F: FnOnce() -> HeraldResult<ContributorSet>,
{
  let github = github_layer(team, read_cached)?;
  merge_contributors(&team.contributors, &github, &team.developers)
}
