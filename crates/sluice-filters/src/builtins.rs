//! Registration of every built-in filter under its name and aliases.

use crate::cast::{Boolean, ToFloat, ToInt, ToNull};
use crate::chars::{Alnum, Alpha, Digits, PregReplace};
use crate::compress::{Compress, Decompress};
use crate::date::{DateSelect, SelectKind};
use crate::list::{AllowList, DenyList};
use crate::markup::StripTags;
use crate::string::{
    StringPrefix, StringSuffix, StringToLower, StringToUpper, StringTrim, StripNewlines,
};
use crate::word::{CamelCaseToSeparator, SeparatorToCamelCase, SeparatorToSeparator};
use sluice_core::{parse_options, Options, Result};
use sluice_registry::FilterRegistry;
use std::sync::Arc;
use tracing::debug;

/// Alias → registered name.
const ALIASES: &[(&str, &str)] = &[
    ("int", "ToInt"),
    ("ToInteger", "ToInt"),
    ("float", "ToFloat"),
    ("null", "ToNull"),
    ("bool", "Boolean"),
    ("RegexReplace", "PregReplace"),
    ("Uppercase", "StringToUpper"),
    ("Lowercase", "StringToLower"),
    ("Trim", "StringTrim"),
    ("Whitelist", "AllowList"),
    ("Blacklist", "DenyList"),
    ("Word\\CamelCaseToDash", "CamelCaseToDash"),
    ("Word\\CamelCaseToSeparator", "CamelCaseToSeparator"),
    ("Word\\CamelCaseToUnderscore", "CamelCaseToUnderscore"),
    ("Word\\DashToCamelCase", "DashToCamelCase"),
    ("Word\\DashToUnderscore", "DashToUnderscore"),
    ("Word\\SeparatorToCamelCase", "SeparatorToCamelCase"),
    ("Word\\SeparatorToSeparator", "SeparatorToSeparator"),
    ("Word\\UnderscoreToCamelCase", "UnderscoreToCamelCase"),
    ("Word\\UnderscoreToDash", "UnderscoreToDash"),
];

/// Filters with a fixed separator accept no options.
fn fixed<T: 'static>(
    name: &'static str,
    make: fn() -> T,
) -> impl Fn(&Options) -> Result<T> + Send + Sync + 'static {
    move |options: &Options| {
        parse_options::<crate::util::NoOptions>(name, options)?;
        Ok(make())
    }
}

/// Register every built-in filter and alias on `registry`.
pub fn register_builtins(registry: &FilterRegistry) {
    registry
        .register_filter("StringToUpper", StringToUpper::from_options)
        .register_filter("StringToLower", StringToLower::from_options)
        .register_filter("StringTrim", StringTrim::from_options)
        .register_filter("StripNewlines", StripNewlines::from_options)
        .register_filter("StringPrefix", StringPrefix::from_options)
        .register_filter("StringSuffix", StringSuffix::from_options)
        .register_filter("StripTags", StripTags::from_options)
        .register_filter("Digits", Digits::from_options)
        .register_filter("Alpha", Alpha::from_options)
        .register_filter("Alnum", Alnum::from_options)
        .register_filter("PregReplace", PregReplace::from_options)
        .register_filter("ToInt", ToInt::from_options)
        .register_filter("ToFloat", ToFloat::from_options)
        .register_filter("ToNull", ToNull::from_options)
        .register_filter("Boolean", Boolean::from_options)
        .register_filter("AllowList", AllowList::from_options)
        .register_filter("DenyList", DenyList::from_options)
        .register_filter("CamelCaseToSeparator", CamelCaseToSeparator::from_options)
        .register_filter("CamelCaseToDash", fixed("CamelCaseToDash", CamelCaseToSeparator::dash))
        .register_filter(
            "CamelCaseToUnderscore",
            fixed("CamelCaseToUnderscore", CamelCaseToSeparator::underscore),
        )
        .register_filter("SeparatorToCamelCase", SeparatorToCamelCase::from_options)
        .register_filter("DashToCamelCase", fixed("DashToCamelCase", SeparatorToCamelCase::dash))
        .register_filter(
            "UnderscoreToCamelCase",
            fixed("UnderscoreToCamelCase", SeparatorToCamelCase::underscore),
        )
        .register_filter("SeparatorToSeparator", SeparatorToSeparator::from_options)
        .register_filter(
            "DashToUnderscore",
            fixed("DashToUnderscore", SeparatorToSeparator::dash_to_underscore),
        )
        .register_filter(
            "UnderscoreToDash",
            fixed("UnderscoreToDash", SeparatorToSeparator::underscore_to_dash),
        )
        .register_filter("MonthSelect", |o: &Options| DateSelect::from_options(SelectKind::Month, o))
        .register_filter("DateSelect", |o: &Options| DateSelect::from_options(SelectKind::Date, o))
        .register_filter("DateTimeSelect", |o: &Options| {
            DateSelect::from_options(SelectKind::DateTime, o)
        })
        .register_filter("Compress", Compress::from_options)
        .register_filter("Decompress", Decompress::from_options);

    for (alias, target) in ALIASES {
        if let Err(e) = registry.alias(alias, target) {
            debug!(alias, target, error = %e, "skipping built-in alias");
        }
    }
    debug!(filters = registry.names().len(), "registered built-in filters");
}

/// A fresh registry holding every built-in filter.
///
/// Meant for application entry points; libraries should take a registry
/// as a parameter instead.
pub fn default_registry() -> Arc<FilterRegistry> {
    let registry = FilterRegistry::new();
    register_builtins(&registry);
    Arc::new(registry)
}
