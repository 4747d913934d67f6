//! Page view models.
//!
//! One parameterized builder covers every locale: a `PageRequest` plus the
//! catalog and message tables yield a serializable `PageView`. Views are
//! plain data; markup is left to whatever consumes the JSON.

use crate::catalog::{CatalogIndex, Category, Requirements, Skill, SkillCard};
use crate::locale::{Locale, LocaleRouting};
use crate::messages::Messages;
use crate::routes::{ListingOrder, PageRequest, Route};
use serde::Serialize;

const HOME_FEATURED_LIMIT: usize = 8;
const HOME_POPULAR_LIMIT: usize = 8;
const HOME_RECENT_LIMIT: usize = 4;
const RELATED_LIMIT: usize = 3;

/// Everything a view needs to read.
#[derive(Clone, Copy)]
pub struct ViewContext<'a> {
    pub catalog: &'a CatalogIndex,
    pub messages: &'a Messages,
    pub routing: &'a LocaleRouting,
}

#[derive(Clone, Debug, Serialize)]
pub struct PageView {
    pub locale: Locale,
    /// Public path of this page, locale prefix included.
    pub path: String,
    pub title: String,
    /// Not-found views carry 404; everything else is 200.
    pub status: u16,
    /// The same page in every locale, for the language switcher.
    pub alternates: Vec<Alternate>,
    pub body: PageBody,
}

#[derive(Clone, Debug, Serialize)]
pub struct Alternate {
    pub locale: Locale,
    pub label: &'static str,
    pub href: String,
    pub current: bool,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageBody {
    Home(HomeView),
    Skills(SkillsView),
    Skill(SkillDetailView),
    Category(CategoryView),
    Search(SearchView),
    Submit(SubmitView),
    NotFound(NotFoundView),
}

#[derive(Clone, Debug, Serialize)]
pub struct ListedSkill {
    #[serde(flatten)]
    pub card: SkillCard,
    pub href: String,
    pub category_label: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct CategoryEntry {
    pub slug: String,
    pub icon: String,
    pub label: String,
    pub description: String,
    pub count: usize,
    pub href: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct HomeView {
    pub subtitle: String,
    pub skills_count: String,
    pub total_skills: usize,
    pub categories: Vec<CategoryEntry>,
    pub featured: Vec<ListedSkill>,
    pub popular: Vec<ListedSkill>,
    pub recent: Vec<ListedSkill>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SkillsView {
    pub order: Option<ListingOrder>,
    pub total: String,
    pub skills: Vec<ListedSkill>,
    pub categories: Vec<CategoryEntry>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SkillDetailView {
    pub skill: Skill,
    pub category: Option<CategoryEntry>,
    pub install_command: String,
    pub requirements: Option<Requirements>,
    pub related: Vec<ListedSkill>,
}

#[derive(Clone, Debug, Serialize)]
pub struct CategoryView {
    pub category: CategoryEntry,
    pub total: String,
    pub skills: Vec<ListedSkill>,
    /// Set when the category has no skills yet.
    pub empty_message: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SearchView {
    pub query: String,
    pub summary: String,
    pub results: Vec<ListedSkill>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SubmitView {
    pub subtitle: String,
    pub categories: Vec<CategoryOption>,
}

#[derive(Clone, Debug, Serialize)]
pub struct CategoryOption {
    pub slug: String,
    pub label: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct NotFoundView {
    pub message: String,
    pub back_href: String,
    pub back_label: String,
}

/// Build the view for a resolved request.
pub fn render_page(ctx: ViewContext<'_>, request: &PageRequest) -> PageView {
    let locale = request.locale;
    let m = ctx.messages;
    let (title, body) = match &request.route {
        Route::Home => (
            format!("SkillHub - {}", m.text(locale, "home", "title")),
            PageBody::Home(home_view(ctx, locale)),
        ),
        Route::Skills { order } => (
            m.text(locale, "skills", "title"),
            PageBody::Skills(skills_view(ctx, locale, *order)),
        ),
        Route::Skill { slug } => match ctx.catalog.skill_by_slug(slug) {
            Some(skill) => (
                skill.name.clone(),
                PageBody::Skill(skill_detail_view(ctx, locale, skill)),
            ),
            None => not_found(ctx, locale, "skill", "notFound", &Route::Home, ("common", "backHome")),
        },
        Route::Category { slug } => match ctx.catalog.category_by_slug(slug) {
            Some(category) => {
                let view = category_view(ctx, locale, category);
                (view.category.label.clone(), PageBody::Category(view))
            }
            None => not_found(
                ctx,
                locale,
                "category",
                "notFound",
                &Route::Skills { order: None },
                ("search", "browseAll"),
            ),
        },
        Route::Search { query } => (
            m.text(locale, "search", "title"),
            PageBody::Search(search_view(ctx, locale, query)),
        ),
        Route::Submit => (
            m.text(locale, "submit", "title"),
            PageBody::Submit(submit_view(ctx, locale)),
        ),
        Route::NotFound { .. } => {
            not_found(ctx, locale, "common", "notFound", &Route::Home, ("common", "backHome"))
        }
    };

    let status = if matches!(body, PageBody::NotFound(_)) {
        404
    } else {
        200
    };
    let logical = request.route.path();

    PageView {
        locale,
        path: ctx.routing.localize(locale, &logical),
        title,
        status,
        alternates: Locale::ALL
            .into_iter()
            .map(|alt| Alternate {
                locale: alt,
                label: alt.display_name(),
                href: ctx.routing.localize(alt, &logical),
                current: alt == locale,
            })
            .collect(),
        body,
    }
}

fn not_found(
    ctx: ViewContext<'_>,
    locale: Locale,
    namespace: &str,
    key: &str,
    back: &Route,
    back_label: (&str, &str),
) -> (String, PageBody) {
    let message = ctx.messages.text(locale, namespace, key);
    let view = NotFoundView {
        message: message.clone(),
        back_href: back.href(ctx.routing, locale),
        back_label: ctx.messages.text(locale, back_label.0, back_label.1),
    };
    (message, PageBody::NotFound(view))
}

fn home_view(ctx: ViewContext<'_>, locale: Locale) -> HomeView {
    let catalog = ctx.catalog;
    let featured: Vec<&Skill> = catalog
        .featured_skills()
        .into_iter()
        .take(HOME_FEATURED_LIMIT)
        .collect();
    HomeView {
        subtitle: ctx.messages.text(locale, "home", "subtitle"),
        skills_count: count_text(ctx, locale, "home", "skillsCount", catalog.len()),
        total_skills: catalog.len(),
        categories: category_entries(ctx, locale),
        featured: listed(ctx, locale, &featured),
        popular: listed(ctx, locale, &catalog.popular_skills(HOME_POPULAR_LIMIT)),
        recent: listed(ctx, locale, &catalog.recent_skills(HOME_RECENT_LIMIT)),
    }
}

fn skills_view(ctx: ViewContext<'_>, locale: Locale, order: Option<ListingOrder>) -> SkillsView {
    let catalog = ctx.catalog;
    let skills: Vec<&Skill> = match order {
        None => catalog.skills().iter().collect(),
        Some(ListingOrder::Featured) => catalog.featured_skills(),
        Some(ListingOrder::Popular) => catalog.popular_skills(catalog.len()),
        Some(ListingOrder::Recent) => catalog.recent_skills(catalog.len()),
    };
    SkillsView {
        order,
        total: count_text(ctx, locale, "skills", "totalSkills", skills.len()),
        skills: listed(ctx, locale, &skills),
        categories: category_entries(ctx, locale),
    }
}

fn skill_detail_view(ctx: ViewContext<'_>, locale: Locale, skill: &Skill) -> SkillDetailView {
    let catalog = ctx.catalog;
    SkillDetailView {
        skill: skill.clone(),
        category: catalog
            .category_by_slug(skill.category.as_str())
            .map(|category| category_entry(ctx, locale, category)),
        install_command: skill.install_command(),
        requirements: skill.requirements().cloned(),
        related: listed(ctx, locale, &catalog.related_skills(skill, RELATED_LIMIT)),
    }
}

fn category_view(ctx: ViewContext<'_>, locale: Locale, category: &Category) -> CategoryView {
    let skills = ctx.catalog.skills_by_category(category.slug.as_str());
    let empty_message = skills
        .is_empty()
        .then(|| ctx.messages.text(locale, "skills", "noSkills"));
    CategoryView {
        category: category_entry(ctx, locale, category),
        total: count_text(ctx, locale, "skills", "totalSkills", skills.len()),
        skills: listed(ctx, locale, &skills),
        empty_message,
    }
}

fn search_view(ctx: ViewContext<'_>, locale: Locale, query: &str) -> SearchView {
    let query = query.trim();
    let results = ctx.catalog.search_skills(query);
    let summary = if query.is_empty() {
        ctx.messages.text(locale, "search", "enterKeyword")
    } else if results.is_empty() {
        ctx.messages.text(locale, "search", "noResults")
    } else {
        ctx.messages.format(
            locale,
            "search",
            "found",
            &[
                ("count", results.len().to_string()),
                ("query", query.to_string()),
            ],
        )
    };
    SearchView {
        query: query.to_string(),
        summary,
        results: listed(ctx, locale, &results),
    }
}

fn submit_view(ctx: ViewContext<'_>, locale: Locale) -> SubmitView {
    SubmitView {
        subtitle: ctx.messages.text(locale, "submit", "subtitle"),
        categories: ctx
            .catalog
            .categories()
            .iter()
            .map(|category| CategoryOption {
                slug: category.slug.0.clone(),
                label: ctx.messages.category_label(locale, category.slug.as_str()),
            })
            .collect(),
    }
}

fn count_text(
    ctx: ViewContext<'_>,
    locale: Locale,
    namespace: &str,
    key: &str,
    count: usize,
) -> String {
    ctx.messages
        .format(locale, namespace, key, &[("count", count.to_string())])
}

fn category_entries(ctx: ViewContext<'_>, locale: Locale) -> Vec<CategoryEntry> {
    ctx.catalog
        .categories()
        .iter()
        .map(|category| category_entry(ctx, locale, category))
        .collect()
}

fn category_entry(ctx: ViewContext<'_>, locale: Locale, category: &Category) -> CategoryEntry {
    let slug = category.slug.as_str();
    CategoryEntry {
        slug: slug.to_string(),
        icon: category.icon.clone(),
        label: ctx.messages.category_label(locale, slug),
        description: category.description.clone(),
        count: ctx.catalog.category_count(slug),
        href: Route::Category {
            slug: slug.to_string(),
        }
        .href(ctx.routing, locale),
    }
}

fn listed(ctx: ViewContext<'_>, locale: Locale, skills: &[&Skill]) -> Vec<ListedSkill> {
    skills
        .iter()
        .map(|skill| ListedSkill {
            card: skill.card(),
            href: Route::Skill {
                slug: skill.slug.0.clone(),
            }
            .href(ctx.routing, locale),
            category_label: ctx
                .messages
                .category_label(locale, skill.category.as_str()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::resolve_request;

    fn render(path: &str, query: Option<&str>) -> PageView {
        let catalog = CatalogIndex::builtin().unwrap();
        let messages = Messages::builtin().unwrap();
        let routing = LocaleRouting::default();
        let ctx = ViewContext {
            catalog: &catalog,
            messages: &messages,
            routing: &routing,
        };
        render_page(ctx, &resolve_request(&routing, path, query))
    }

    #[test]
    fn home_respects_listing_limits() {
        let view = render("/", None);
        assert_eq!(view.status, 200);
        let PageBody::Home(home) = view.body else {
            panic!("expected home view");
        };
        assert!(home.featured.len() <= HOME_FEATURED_LIMIT);
        assert_eq!(home.popular.len(), HOME_POPULAR_LIMIT);
        assert_eq!(home.recent.len(), HOME_RECENT_LIMIT);
        assert_eq!(home.categories.len(), 10);
    }

    #[test]
    fn unknown_skill_renders_not_found_with_back_link() {
        let view = render("/zh/skills/does-not-exist", None);
        assert_eq!(view.status, 404);
        assert_eq!(view.locale, Locale::Zh);
        let PageBody::NotFound(nf) = view.body else {
            panic!("expected not-found view");
        };
        assert_eq!(nf.back_href, "/zh");
        assert_eq!(nf.message, "未找到该技能");
    }

    #[test]
    fn unknown_category_links_back_to_listing() {
        let view = render("/categories/no-such-category", None);
        assert_eq!(view.status, 404);
        let PageBody::NotFound(nf) = view.body else {
            panic!("expected not-found view");
        };
        assert_eq!(nf.back_href, "/skills");
    }

    #[test]
    fn skill_detail_lists_related_and_install_command() {
        let view = render("/skills/weather", None);
        assert_eq!(view.title, "Weather");
        let PageBody::Skill(detail) = view.body else {
            panic!("expected skill view");
        };
        assert!(detail.install_command.starts_with("Read https://"));
        assert!(detail.related.len() <= RELATED_LIMIT);
        assert!(detail.related.iter().all(|s| s.card.slug.as_str() != "weather"));
        assert_eq!(
            detail.category.map(|c| c.label),
            Some("Information".to_string())
        );
    }

    #[test]
    fn alternates_follow_prefix_policy() {
        let view = render("/zh/submit", None);
        let hrefs: Vec<(&str, bool)> = view
            .alternates
            .iter()
            .map(|alt| (alt.href.as_str(), alt.current))
            .collect();
        assert_eq!(hrefs, [("/submit", false), ("/zh/submit", true)]);
    }

    #[test]
    fn blank_search_prompts_for_keyword() {
        let view = render("/search", Some("q=%20%20"));
        let PageBody::Search(search) = view.body else {
            panic!("expected search view");
        };
        assert!(search.results.is_empty());
        assert_eq!(search.summary, "Enter a keyword to search");
    }
}
