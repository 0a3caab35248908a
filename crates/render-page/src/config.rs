//! Content documents authored alongside the page template.
//!
//! Every field is optional: sections whose data is missing are left as
//! the template has them.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct Profile {
    pub title: Option<String>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub position: Option<String>,
    pub tagline: Option<String>,
    pub profile_image: Option<String>,
    pub social: Option<Social>,
    pub about: Option<About>,
    pub contact: Option<Contact>,
    pub footer: Option<Footer>,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct Social {
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub google_scholar: Option<String>,
    pub cv: Option<String>,
    pub orcid: Option<String>,
    /// Networks without an icon are accepted but not rendered.
    #[serde(flatten)]
    pub _rest: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct About {
    pub lead: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub paragraphs: Vec<String>,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct Contact {
    pub email: Option<String>,
    pub location: Option<Location>,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct Location {
    pub department: Option<String>,
    pub institution: Option<String>,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct Footer {
    pub copyright_name: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct Publications {
    pub publications: Option<Vec<Publication>>,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct Publication {
    pub title: Option<String>,
    pub authors: Option<String>,
    pub description: Option<String>,
    pub venue: Option<String>,
    pub year: Option<Year>,
    pub image: Option<String>,
    pub links: Option<PublicationLinks>,
}

/// Authors write years both as numbers and as strings ("2024", "to appear").
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(untagged)]
pub enum Year {
    Number(i64),
    Float(f64),
    Text(String),
}

impl std::fmt::Display for Year {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Year::Number(n) => write!(f, "{}", n),
            Year::Float(n) => write!(f, "{}", n),
            Year::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct PublicationLinks {
    pub paper: Option<String>,
    pub code: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct News {
    pub news: Option<Vec<NewsItem>>,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct NewsItem {
    pub date: Option<String>,
    pub text: Option<String>,
}

/// Everything the renderer needs, loaded up front.
#[derive(Debug, Clone, Default)]
pub struct SiteData {
    pub profile: Profile,
    pub publications: Publications,
    pub news: News,
}

/// `null` reads as an absent field.
fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de> + Default,
{
    use serde::Deserialize;
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}
