//! Boundary to the localized string table.

use shared::domain::Locale;

pub const HOME_TITLE: &str = "home_title";
pub const TOTAL_FORMAT: &str = "total_format";
pub const CHANGE_LANGUAGE: &str = "change_language";

/// Argument substituted into a template placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringArg {
    /// Fills `{count}`.
    Count(usize),
}

pub trait StringResolver: Send + Sync {
    /// Resolves `key` for `locale`. Unknown keys resolve to the key itself.
    fn resolve(&self, locale: Locale, key: &str, args: &[StringArg]) -> String;
}

/// The two-locale table the app ships with.
#[derive(Debug, Default, Clone, Copy)]
pub struct BundledStrings;

impl BundledStrings {
    fn template(locale: Locale, key: &str) -> Option<&'static str> {
        let template = match (locale, key) {
            (Locale::English, HOME_TITLE) => "Diagnosis History",
            (Locale::English, TOTAL_FORMAT) => "Total {count}",
            (Locale::English, CHANGE_LANGUAGE) => "Change language",
            (Locale::English, "filter_all") => "All",
            (Locale::English, "filter_basic") => "Basic",
            (Locale::English, "filter_premium") => "Premium",
            (Locale::Korean, HOME_TITLE) => "진단 내역",
            (Locale::Korean, TOTAL_FORMAT) => "총 {count}건",
            (Locale::Korean, CHANGE_LANGUAGE) => "언어 변경",
            (Locale::Korean, "filter_all") => "전체",
            (Locale::Korean, "filter_basic") => "베이직",
            (Locale::Korean, "filter_premium") => "프리미엄",
            _ => return None,
        };
        Some(template)
    }
}

impl StringResolver for BundledStrings {
    fn resolve(&self, locale: Locale, key: &str, args: &[StringArg]) -> String {
        let Some(template) = Self::template(locale, key) else {
            return key.to_string();
        };
        substitute(template, args)
    }
}

fn substitute(template: &str, args: &[StringArg]) -> String {
    args.iter().fold(template.to_string(), |acc, arg| match arg {
        StringArg::Count(n) => acc.replace("{count}", &n.to_string()),
    })
}
