//! Static association allow-lists for the `include` query parameter.
//!
//! Each entity has a fixed table of loadable associations; names are
//! resolved against it at parse time and unrecognized names are silently
//! ignored rather than erroring.

/// Associations loadable on a group read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupInclude {
    Admin,
    Creator,
    Users,
    WishLists,
    Invitations,
}

impl GroupInclude {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "admin" => Some(Self::Admin),
            "creator" => Some(Self::Creator),
            "users" => Some(Self::Users),
            "wishLists" => Some(Self::WishLists),
            "invitations" => Some(Self::Invitations),
            _ => None,
        }
    }

    /// Parse a comma-separated `include` value, dropping unknown names.
    pub fn from_csv(csv: &str) -> Vec<Self> {
        parse_csv(csv, Self::parse)
    }
}

/// Associations loadable on an invitation read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvitationInclude {
    Group,
    Creator,
}

impl InvitationInclude {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "group" => Some(Self::Group),
            "creator" => Some(Self::Creator),
            _ => None,
        }
    }

    pub fn from_csv(csv: &str) -> Vec<Self> {
        parse_csv(csv, Self::parse)
    }
}

/// Associations loadable on a wishlist item read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WishListInclude {
    Group,
    Creator,
}

impl WishListInclude {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "group" => Some(Self::Group),
            "creator" => Some(Self::Creator),
            _ => None,
        }
    }

    pub fn from_csv(csv: &str) -> Vec<Self> {
        parse_csv(csv, Self::parse)
    }
}

fn parse_csv<T: PartialEq>(csv: &str, parse: fn(&str) -> Option<T>) -> Vec<T> {
    let mut out = Vec::new();
    for name in csv.split(',') {
        if let Some(include) = parse(name.trim()) {
            if !out.contains(&include) {
                out.push(include);
            }
        }
    }
    out
}
