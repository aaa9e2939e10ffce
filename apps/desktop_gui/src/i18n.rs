//! Message keys and their localized text, including count-based
//! pluralization. Keys stay separate from display text so adding a locale
//! is a matter of extending the per-language tables.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    UpdatedCustomFilteringToast,
    FilterAddedSuccessfully,
    FilterRemovedSuccessfully,
    FilterUpdated,
    AllListsUpToDateToast,
    ConfigSuccessfullySaved,
    EnabledFilteringToast,
    DisabledFilteringToast,
    UpstreamDnsFileAddedSuccessfully,
    UpstreamDnsFileRemovedSuccessfully,
    UpstreamDnsFileUpdated,
    UpstreamDnsFilesUpToDateToast,
    ListConfirmDelete,
}

/// Messages that interpolate a count and pluralize on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountedMessageKey {
    ListUpdated,
    UpstreamDnsFilesUpdated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lang {
    #[default]
    En,
}

impl Lang {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "en" => Some(Lang::En),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Locale {
    lang: Lang,
}

impl Locale {
    pub fn new(lang: Lang) -> Self {
        Self { lang }
    }

    pub fn text(&self, key: MessageKey) -> &'static str {
        match self.lang {
            Lang::En => en_text(key),
        }
    }

    pub fn text_count(&self, key: CountedMessageKey, count: u64) -> String {
        match self.lang {
            Lang::En => en_text_count(key, count),
        }
    }
}

fn en_text(key: MessageKey) -> &'static str {
    match key {
        MessageKey::UpdatedCustomFilteringToast => "Custom filtering rules saved",
        MessageKey::FilterAddedSuccessfully => "Filter list added successfully",
        MessageKey::FilterRemovedSuccessfully => "Filter list removed successfully",
        MessageKey::FilterUpdated => "Filter list updated",
        MessageKey::AllListsUpToDateToast => "All lists are already up to date",
        MessageKey::ConfigSuccessfullySaved => "Configuration saved",
        MessageKey::EnabledFilteringToast => "Filtering enabled",
        MessageKey::DisabledFilteringToast => "Filtering disabled",
        MessageKey::UpstreamDnsFileAddedSuccessfully => "Upstream DNS file added successfully",
        MessageKey::UpstreamDnsFileRemovedSuccessfully => "Upstream DNS file removed successfully",
        MessageKey::UpstreamDnsFileUpdated => "Upstream DNS file updated",
        MessageKey::UpstreamDnsFilesUpToDateToast => {
            "All upstream DNS files are already up to date"
        }
        MessageKey::ListConfirmDelete => "Are you sure you want to delete this list?",
    }
}

fn en_text_count(key: CountedMessageKey, count: u64) -> String {
    match key {
        CountedMessageKey::ListUpdated => {
            if count == 1 {
                "1 list updated".to_string()
            } else {
                format!("{count} lists updated")
            }
        }
        CountedMessageKey::UpstreamDnsFilesUpdated => {
            if count == 1 {
                "1 upstream DNS file updated".to_string()
            } else {
                format!("{count} upstream DNS files updated")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counted_messages_pluralize() {
        let locale = Locale::new(Lang::En);
        assert_eq!(
            locale.text_count(CountedMessageKey::ListUpdated, 1),
            "1 list updated"
        );
        assert_eq!(
            locale.text_count(CountedMessageKey::ListUpdated, 3),
            "3 lists updated"
        );
        assert_eq!(
            locale.text_count(CountedMessageKey::UpstreamDnsFilesUpdated, 2),
            "2 upstream DNS files updated"
        );
    }

    #[test]
    fn unknown_language_tag_is_rejected() {
        assert_eq!(Lang::from_tag("en"), Some(Lang::En));
        assert_eq!(Lang::from_tag("xx"), None);
    }
}
