//! # Audience Selection
//!
//! Which partners an action is aimed at. Resolution happens against a
//! concrete release, and always yields partner ids in roster order with no
//! repeats, whatever order the caller listed them in.

use serde::{Deserialize, Serialize};

use cutover_core::{CutoverError, PartnerId};
use cutover_release::Release;

use crate::outcome::Rejection;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "partners", rename_all = "snake_case")]
pub enum Audience {
    /// A single partner.
    Partner(PartnerId),
    /// An explicit list of partners. May be empty.
    Partners(Vec<PartnerId>),
    /// Whichever partners are currently checked.
    Checked,
    /// Every partner in the release.
    All,
}

impl Audience {
    /// Resolve to partner ids of `release`, in roster order.
    ///
    /// # Errors
    ///
    /// [`Rejection::UnknownPartner`] if an explicitly named partner is not
    /// in the release.
    pub fn resolve(&self, release: &Release) -> Result<Vec<PartnerId>, Rejection> {
        let named: &[PartnerId] = match self {
            Self::All => return Ok(release.partner_ids()),
            Self::Checked => {
                return Ok(release
                    .checked_partners()
                    .into_iter()
                    .map(|p| p.id().clone())
                    .collect())
            }
            Self::Partner(id) => std::slice::from_ref(id),
            Self::Partners(ids) => ids,
        };
        if let Some(missing) = named.iter().find(|id| release.partner(id).is_none()) {
            return Err(Rejection::UnknownPartner(missing.clone()));
        }
        Ok(release
            .partners()
            .iter()
            .filter(|p| named.contains(p.id()))
            .map(|p| p.id().clone())
            .collect())
    }
}

impl std::fmt::Display for Audience {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Partner(id) => write!(f, "{id}"),
            Self::Partners(ids) => {
                let ids: Vec<&str> = ids.iter().map(PartnerId::as_str).collect();
                f.write_str(&ids.join(","))
            }
            Self::Checked => f.write_str("checked"),
            Self::All => f.write_str("all"),
        }
    }
}

impl std::str::FromStr for Audience {
    type Err = CutoverError;

    /// `all`, `checked`, or comma-separated partner ids.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        if trimmed.eq_ignore_ascii_case("checked") {
            return Ok(Self::Checked);
        }
        let ids = trimmed
            .split(',')
            .map(PartnerId::new)
            .collect::<Result<Vec<_>, _>>()?;
        match <[PartnerId; 1]>::try_from(ids) {
            Ok([only]) => Ok(Self::Partner(only)),
            Err(ids) => Ok(Self::Partners(ids)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutover_release::demo_release;

    fn id(s: &str) -> PartnerId {
        PartnerId::new(s).unwrap()
    }

    #[test]
    fn resolves_in_roster_order_without_repeats() {
        let release = demo_release().unwrap();
        let audience = Audience::Partners(vec![id("AHMED"), id("ASIM"), id("AHMED")]);
        assert_eq!(audience.resolve(&release).unwrap(), vec![id("ASIM"), id("AHMED")]);
    }

    #[test]
    fn all_and_checked() {
        let release = demo_release().unwrap();
        assert_eq!(Audience::All.resolve(&release).unwrap().len(), 4);
        assert!(Audience::Checked.resolve(&release).unwrap().is_empty());

        let release = release.with_partner_checked(&id("HASSAN"), true).unwrap();
        assert_eq!(Audience::Checked.resolve(&release).unwrap(), vec![id("HASSAN")]);
    }

    #[test]
    fn unknown_partner_is_rejected() {
        let release = demo_release().unwrap();
        let err = Audience::Partner(id("ZED")).resolve(&release).unwrap_err();
        assert_eq!(err, Rejection::UnknownPartner(id("ZED")));
    }

    #[test]
    fn parse() {
        assert_eq!("all".parse::<Audience>().unwrap(), Audience::All);
        assert_eq!("Checked".parse::<Audience>().unwrap(), Audience::Checked);
        assert_eq!("ASIM".parse::<Audience>().unwrap(), Audience::Partner(id("ASIM")));
        assert_eq!(
            "ASIM, AAMIR".parse::<Audience>().unwrap(),
            Audience::Partners(vec![id("ASIM"), id("AAMIR")])
        );
        assert!("ASIM,,AAMIR".parse::<Audience>().is_err());
    }

    #[test]
    fn display_matches_parse_syntax() {
        let audience = Audience::Partners(vec![id("ASIM"), id("AAMIR")]);
        assert_eq!(audience.to_string(), "ASIM,AAMIR");
        assert_eq!(audience.to_string().parse::<Audience>().unwrap(), audience);
    }
}
