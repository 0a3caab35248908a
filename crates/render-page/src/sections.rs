//! Builds the content of each template element from the site data.
//!
//! Rich-text fields go through the sanitizer; every other value is
//! escaped. Nothing here touches the template itself.

use std::collections::BTreeMap;

use sanitize::{escape_attribute as attr, escape_body as body, escape_text, sanitize};

use crate::config::{About, Contact, Location, NewsItem, Profile, Publication, PublicationLinks, SiteData, Social};
use crate::icons;

/// News items shown before the "Show more" button takes over.
pub const NEWS_VISIBLE: usize = 4;

const EXTERNAL: &str = r#"target="_blank" rel="noopener noreferrer""#;

/// What to do with an element found by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fill {
    /// Replace the element's content with escaped text.
    Text(String),
    /// Replace the element's content with markup.
    Html(String),
    /// Set an attribute, leaving the content alone.
    Attribute(&'static str, String),
}

pub type PagePlan = BTreeMap<&'static str, Fill>;

struct SocialNetwork {
    label: &'static str,
    icon: &'static str,
    url: fn(&Social) -> Option<&String>,
}

// Display order of the social icons.
const SOCIAL_NETWORKS: &[SocialNetwork] = &[
    SocialNetwork { label: "GitHub", icon: icons::GITHUB, url: |s| s.github.as_ref() },
    SocialNetwork { label: "LinkedIn", icon: icons::LINKEDIN, url: |s| s.linkedin.as_ref() },
    SocialNetwork { label: "Google Scholar", icon: icons::GOOGLE_SCHOLAR, url: |s| s.google_scholar.as_ref() },
    SocialNetwork { label: "CV", icon: icons::CV, url: |s| s.cv.as_ref() },
    SocialNetwork { label: "ORCID", icon: icons::ORCID, url: |s| s.orcid.as_ref() },
];

struct PublicationLink {
    label: &'static str,
    icon: &'static str,
    url: fn(&PublicationLinks) -> Option<&String>,
}

const PUBLICATION_LINKS: &[PublicationLink] = &[
    PublicationLink { label: "Paper", icon: icons::PAPER, url: |l| l.paper.as_ref() },
    PublicationLink { label: "Code", icon: icons::CODE, url: |l| l.code.as_ref() },
    PublicationLink { label: "Page", icon: icons::PAGE, url: |l| l.page.as_ref() },
];

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

fn or_empty(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

/// Works out the content of every element the site data has something
/// for. Ids missing from the plan are left untouched.
pub fn plan_page(site: &SiteData, year: i32) -> PagePlan {
    let profile = &site.profile;
    let mut plan = PagePlan::new();

    plan.insert("hero-name", Fill::Text(hero_name(profile)));
    plan.insert("hero-position", Fill::Text(or_empty(&profile.position).into()));
    plan.insert("hero-tagline", Fill::Text(or_empty(&profile.tagline).into()));

    if let Some(image) = profile_image(profile) {
        plan.insert("profile-image", Fill::Html(image));
    }
    if let Some(social) = &profile.social {
        plan.insert("hero-social-links", Fill::Html(social_links(social, "hero-social-link")));
        plan.insert("social-links", Fill::Html(social_links(social, "social-link")));
        if let Some(scholar) = non_empty(social.google_scholar.as_ref()) {
            plan.insert("publications-cta", Fill::Html(scholar_button(scholar)));
        }
    }
    if let Some(about) = &profile.about {
        plan.insert("about-text", Fill::Html(about_text(about)));
    }

    if let Some(items) = &site.news.news {
        plan.insert("news-list", Fill::Html(news_list(items)));
        if items.len() > NEWS_VISIBLE {
            plan.insert("news-expand-btn", Fill::Attribute("style", "display: inline-block".into()));
        }
    }

    if let Some(publications) = &site.publications.publications {
        plan.insert("publications-grid", Fill::Html(publications.iter().map(publication_card).collect()));
    }

    if let Some(contact) = &profile.contact {
        plan.insert("contact-info", Fill::Html(contact_info(contact, profile.social.as_ref())));
    }

    if let Some(footer) = &profile.footer {
        plan.insert("footer-name", Fill::Text(or_empty(&footer.copyright_name).into()));
        plan.insert("footer-note", Fill::Text(or_empty(&footer.note).into()));
    }

    plan.insert("current-year", Fill::Text(year.to_string()));
    plan
}

pub fn hero_name(profile: &Profile) -> String {
    format!("{} {} {}", or_empty(&profile.title), or_empty(&profile.name), or_empty(&profile.surname))
        .trim()
        .to_owned()
}

fn display_name(profile: &Profile) -> String {
    format!("{} {}", or_empty(&profile.name), or_empty(&profile.surname))
        .trim()
        .to_owned()
}

pub fn profile_image(profile: &Profile) -> Option<String> {
    let src = non_empty(profile.profile_image.as_ref())?;
    Some(format!(
        r#"<img src="{}" alt="{}" class="profile-img">"#,
        attr(src), attr(&display_name(profile)),
    ))
}

pub fn social_links(social: &Social, class: &str) -> String {
    let mut out = String::new();
    for network in SOCIAL_NETWORKS {
        if let Some(url) = non_empty((network.url)(social)) {
            out.push_str(&format!(
                r#"<a href="{}" {} class="{}" aria-label="{}">{}</a>"#,
                attr(url), EXTERNAL, attr(class), network.label, network.icon,
            ));
        }
    }
    out
}

pub fn about_text(about: &About) -> String {
    let mut out = String::new();
    if let Some(lead) = non_empty(about.lead.as_ref()) {
        out.push_str(&format!(r#"<p class="about-lead">{}</p>"#, sanitize(lead)));
    }
    for paragraph in &about.paragraphs {
        out.push_str(&format!("<p>{}</p>", sanitize(paragraph.as_str())));
    }
    out
}

pub fn news_list(items: &[NewsItem]) -> String {
    let mut out = String::new();
    for (index, item) in items.iter().enumerate() {
        let class = if index >= NEWS_VISIBLE { "news-item news-hidden" } else { "news-item" };
        out.push_str(&format!(
            r#"<li class="{}"><span class="news-date">{}</span><span class="news-text">{}</span></li>"#,
            class, body(or_empty(&item.date)), sanitize(item.text.as_deref()),
        ));
    }
    out
}

pub fn publication_card(publication: &Publication) -> String {
    let image = match non_empty(publication.image.as_ref()) {
        // alt goes through the strict escape: it is the one attribute
        // carrying free-form author text
        Some(src) => format!(r#"<img src="{}" alt="{}">"#, attr(src), escape_text(or_empty(&publication.title))),
        None => icons::PUBLICATION_PLACEHOLDER.to_owned(),
    };

    let venue = format!(
        "{} {}",
        or_empty(&publication.venue),
        publication.year.as_ref().map(ToString::to_string).unwrap_or_default(),
    );

    let mut links = String::new();
    if let Some(publication_links) = &publication.links {
        for link in PUBLICATION_LINKS {
            if let Some(url) = non_empty((link.url)(publication_links)) {
                links.push_str(&format!(
                    r#"<a href="{}" class="publication-link" {}>{} {}</a>"#,
                    attr(url), EXTERNAL, link.icon, link.label,
                ));
            }
        }
    }

    format!(
        concat!(
            r#"<article class="publication-card fade-in">"#,
            r#"<div class="publication-image">{}</div>"#,
            r#"<div class="publication-content">"#,
            r#"<span class="publication-venue">{}</span>"#,
            r#"<h3 class="publication-title">{}</h3>"#,
            r#"<p class="publication-authors">{}</p>"#,
            r#"<p class="publication-description">{}</p>"#,
            r#"<div class="publication-links">{}</div>"#,
            "</div></article>",
        ),
        image,
        body(venue.trim()),
        body(or_empty(&publication.title)),
        sanitize(publication.authors.as_deref()),
        sanitize(publication.description.as_deref()),
        links,
    )
}

pub fn scholar_button(url: &str) -> String {
    format!(
        r#"<a href="{}" {} class="btn btn-outline">View All on Google Scholar</a>"#,
        attr(url), EXTERNAL,
    )
}

fn contact_item(icon: &str, title: &str, details: &str) -> String {
    format!(
        r#"<div class="contact-item"><div class="contact-icon">{}</div><div class="contact-details"><h3>{}</h3>{}</div></div>"#,
        icon, title, details,
    )
}

pub fn contact_info(contact: &Contact, social: Option<&Social>) -> String {
    let mut out = String::new();

    if let Some(email) = non_empty(contact.email.as_ref()) {
        let link = format!(r#"<a href="mailto:{}">{}</a>"#, attr(email), body(email));
        out.push_str(&contact_item(icons::EMAIL, "Email", &link));
    }

    if let Some(location) = &contact.location {
        let lines = format!("<p>{}</p>", location_lines(location));
        out.push_str(&contact_item(icons::LOCATION, "Location", &lines));
    }

    if let Some(linkedin) = social.and_then(|s| non_empty(s.linkedin.as_ref())) {
        let link = format!(r#"<a href="{}" {}>Connect with me</a>"#, attr(linkedin), EXTERNAL);
        out.push_str(&contact_item(icons::LINKEDIN_OUTLINE, "LinkedIn", &link));
    }

    out
}

/// Department and institution, one per line; blank lines are dropped.
pub fn location_lines(location: &Location) -> String {
    let text = format!("{}\n{}", or_empty(&location.department), or_empty(&location.institution));
    text.split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(body)
        .collect::<Vec<_>>()
        .join("<br>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Footer, News, Publications, Year};

    fn profile() -> Profile {
        Profile {
            title: Some("Dr.".into()),
            name: Some("Ada".into()),
            surname: Some("Lovelace".into()),
            ..Default::default()
        }
    }

    #[test]
    fn hero_name_trims_missing_parts() {
        assert_eq!(hero_name(&profile()), "Dr. Ada Lovelace");
        let p = Profile { title: None, ..profile() };
        assert_eq!(hero_name(&p), "Ada Lovelace");
        // inner gaps are kept
        let p = Profile { name: None, ..profile() };
        assert_eq!(hero_name(&p), "Dr.  Lovelace");
        assert_eq!(hero_name(&Profile::default()), "");
    }

    #[test]
    fn profile_image_needs_a_source() {
        assert_eq!(profile_image(&profile()), None);
        let p = Profile { profile_image: Some("me\".jpg".into()), ..profile() };
        assert_eq!(
            profile_image(&p).unwrap(),
            r#"<img src="me&quot;.jpg" alt="Ada Lovelace" class="profile-img">"#,
        );
    }

    #[test]
    fn social_links_follow_display_order() {
        let social = Social {
            orcid: Some("https://orcid.org/1".into()),
            github: Some("https://github.com/ada".into()),
            cv: Some(String::new()),
            ..Default::default()
        };
        let html = social_links(&social, "social-link");
        let github = html.find("GitHub").unwrap();
        let orcid = html.find("ORCID").unwrap();
        assert!(github < orcid);
        assert!(!html.contains(r#"aria-label="CV""#));
        assert_eq!(html.matches(r#"class="social-link""#).count(), 2);
        assert_eq!(html.matches(EXTERNAL).count(), 2);
    }

    #[test]
    fn about_is_sanitized() {
        let about = About {
            lead: Some("<strong>Hi</strong><script>x()</script>".into()),
            paragraphs: vec!["<em>one</em>".into(), "<img src=x onerror=y>two".into()],
        };
        assert_eq!(
            about_text(&about),
            r#"<p class="about-lead"><strong>Hi</strong>x()</p><p><em>one</em></p><p>two</p>"#,
        );
    }

    #[test]
    fn empty_lead_is_skipped() {
        let about = About { lead: Some(String::new()), paragraphs: vec![] };
        assert_eq!(about_text(&about), "");
    }

    #[test]
    fn news_beyond_visible_count_is_hidden() {
        let items = (0..6)
            .map(|i| NewsItem { date: Some(format!("Day {i}")), text: Some(format!("<b>n{i}</b>")) })
            .collect::<Vec<_>>();
        let html = news_list(&items);
        assert_eq!(html.matches(r#"class="news-item""#).count(), NEWS_VISIBLE);
        assert_eq!(html.matches(r#"class="news-item news-hidden""#).count(), 2);
        assert!(html.contains(r#"<span class="news-date">Day 0</span><span class="news-text"><b>n0</b></span>"#));
    }

    #[test]
    fn news_item_without_fields() {
        assert_eq!(
            news_list(&[NewsItem::default()]),
            r#"<li class="news-item"><span class="news-date"></span><span class="news-text"></span></li>"#,
        );
    }

    #[test]
    fn publication_card_contents() {
        let publication = Publication {
            title: Some("Notes & Sketches".into()),
            authors: Some("<u>A. Lovelace</u>, C. Babbage".into()),
            description: Some("<div>On the engine</div>".into()),
            venue: Some("Journal".into()),
            year: Some(Year::Number(1843)),
            image: Some("img/notes.png".into()),
            links: Some(PublicationLinks {
                paper: Some("https://example.org/paper.pdf".into()),
                code: Some(String::new()),
                page: None,
            }),
        };
        let html = publication_card(&publication);
        assert!(html.starts_with(r#"<article class="publication-card fade-in">"#));
        assert!(html.contains(r#"alt="Notes&#32;&amp;&#32;Sketches""#));
        assert!(html.contains(r#"<span class="publication-venue">Journal 1843</span>"#));
        assert!(html.contains(r#"<h3 class="publication-title">Notes &amp; Sketches</h3>"#));
        assert!(html.contains(r#"<p class="publication-authors"><u>A. Lovelace</u>, C. Babbage</p>"#));
        assert!(html.contains(r#"<p class="publication-description">On the engine</p>"#));
        assert_eq!(html.matches(r#"class="publication-link""#).count(), 1);
        assert!(html.contains(" Paper</a>"));
    }

    #[test]
    fn publication_without_image_or_links() {
        let html = publication_card(&Publication { venue: Some("Workshop".into()), ..Default::default() });
        assert!(html.contains(icons::PUBLICATION_PLACEHOLDER));
        assert!(html.contains(r#"<span class="publication-venue">Workshop</span>"#));
        assert!(html.contains(r#"<div class="publication-links"></div>"#));
    }

    #[test]
    fn location_drops_blank_lines() {
        let location = Location { department: Some("  ".into()), institution: Some("Univ <X>".into()) };
        assert_eq!(location_lines(&location), "Univ &lt;X&gt;");
        let location = Location { department: Some("Math".into()), institution: Some("Univ".into()) };
        assert_eq!(location_lines(&location), "Math<br>Univ");
    }

    #[test]
    fn contact_items() {
        let contact = Contact {
            email: Some("ada@example.org".into()),
            location: Some(Location { department: Some("Math".into()), institution: None }),
        };
        let social = Social { linkedin: Some("https://linkedin.com/in/ada".into()), ..Default::default() };
        let html = contact_info(&contact, Some(&social));
        assert_eq!(html.matches(r#"<div class="contact-item">"#).count(), 3);
        assert!(html.contains(r#"<a href="mailto:ada@example.org">ada@example.org</a>"#));
        assert!(html.contains("<h3>Location</h3><p>Math</p>"));
        assert!(html.contains("Connect with me"));

        let html = contact_info(&contact, None);
        assert_eq!(html.matches(r#"<div class="contact-item">"#).count(), 2);
    }

    #[test]
    fn plan_covers_available_sections() {
        let site = SiteData {
            profile: Profile {
                social: Some(Social { google_scholar: Some("https://scholar.example".into()), ..Default::default() }),
                footer: Some(Footer { copyright_name: Some("Ada".into()), note: None }),
                ..profile()
            },
            publications: Publications { publications: Some(vec![]) },
            news: News { news: Some(vec![NewsItem::default(); 5]) },
        };
        let plan = plan_page(&site, 2025);
        assert_eq!(plan.get("hero-name"), Some(&Fill::Text("Dr. Ada Lovelace".into())));
        assert_eq!(plan.get("current-year"), Some(&Fill::Text("2025".into())));
        assert_eq!(plan.get("footer-note"), Some(&Fill::Text(String::new())));
        assert_eq!(plan.get("publications-grid"), Some(&Fill::Html(String::new())));
        assert!(matches!(plan.get("publications-cta"), Some(Fill::Html(_))));
        assert_eq!(
            plan.get("news-expand-btn"),
            Some(&Fill::Attribute("style", "display: inline-block".into())),
        );
        assert!(!plan.contains_key("profile-image"));
        assert!(!plan.contains_key("about-text"));
        assert!(!plan.contains_key("contact-info"));
    }

    #[test]
    fn plan_without_optional_data() {
        let plan = plan_page(&SiteData::default(), 2025);
        let mut keys = plan.keys().copied().collect::<Vec<_>>();
        keys.sort();
        assert_eq!(keys, vec!["current-year", "hero-name", "hero-position", "hero-tagline"]);
    }

    #[test]
    fn expand_button_needs_more_than_visible() {
        let site = SiteData {
            news: News { news: Some(vec![NewsItem::default(); NEWS_VISIBLE]) },
            ..Default::default()
        };
        assert!(!plan_page(&site, 2025).contains_key("news-expand-btn"));
    }
}
