/// Fallback when the link carries no guest name.
pub const DEFAULT_GUEST: &str = "Tamu Undangan";

/// Query parameter holding guest names; repeatable.
pub const GUEST_PARAM: &str = "nama";

/// Guest the invitation is addressed to.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct GuestName(String);

impl GuestName {
    /// Join trimmed, non-blank names with `" & "`, falling back to [`DEFAULT_GUEST`] when
    /// nothing is left.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_owned())
            .filter(|n| !n.is_empty())
            .collect::<Vec<_>>()
            .join(" & ");
        if joined.is_empty() {
            Self(DEFAULT_GUEST.to_owned())
        } else {
            Self(joined)
        }
    }

    /// Resolve from a URL query string (`"nama=Budi&nama=Sari"`, leading `?` optional).
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let names = url::form_urlencoded::parse(query.as_bytes())
            .filter(|(key, _)| key == GUEST_PARAM)
            .map(|(_, value)| value.into_owned());
        Self::from_names(names)
    }

    /// Resolved display name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Salutation shown on the hero banner.
    pub fn greeting(&self) -> String {
        format!("Kepada Bapak/Ibu/Saudara/i {}", self.0)
    }
}

impl Default for GuestName {
    fn default() -> Self {
        Self(DEFAULT_GUEST.to_owned())
    }
}

impl std::fmt::Display for GuestName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/content/guest.rs"]
mod tests;
