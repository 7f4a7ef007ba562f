use chrono::{DateTime, Utc};
use fxhash::{FxHashMap, FxHashSet};
use tracing::{debug, info};

use crate::page_scrapers::{
    IndeedScraper, JobRecord, LinkedinScraper, PageAccessor, PageScraper, SeekScraper,
};

pub(crate) use self::export::Download;

mod export;


/// Shown instead of a preview when the page does not belong to any enabled site.
pub(crate) const UNSUPPORTED_MESSAGE: &str = "Not on a supported job site";
/// How many words of the description make it into the preview.
const PREVIEW_WORDS: usize = 10;

pub(crate) type Extractor = fn(&dyn PageAccessor, &str) -> JobRecord;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SiteKind {
    Seek,
    Linkedin,
    Indeed,
}


/// Extra record fields a site shows in its preview, between the title and the description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PreviewField {
    Location,
    Salary,
}


impl PreviewField {
    fn render(self, job: &JobRecord) -> String {
        match self {
            Self::Location => format!("Location: {}", job.location.as_deref().unwrap_or("Not found")),
            Self::Salary => format!("Salary: {}", job.salary.as_deref().unwrap_or("Not listed")),
        }
    }
}


/// Everything that differs between supported job sites.
#[derive(Clone)]
pub(crate) struct SiteProfile {
    pub(crate) kind: SiteKind,
    pub(crate) name: &'static str,
    /// Pages whose URL starts with this belong to the site.
    pub(crate) base_url: String,
    pub(crate) file_prefix: &'static str,
    /// Shown instead of a preview when nothing that looks like a job title was found.
    pub(crate) missing_title_message: &'static str,
    pub(crate) preview_fields: &'static [PreviewField],
    pub(crate) extract: Extractor,
}


fn default_profiles() -> [SiteProfile; 3] {
    [
        SiteProfile {
            kind: SiteKind::Seek,
            name: SeekScraper::NAME,
            base_url: "https://www.seek.com.au".into(),
            file_prefix: "seek",
            missing_title_message: "Not on a Seek job page",
            preview_fields: &[PreviewField::Location, PreviewField::Salary],
            extract: SeekScraper::scrape,
        },
        SiteProfile {
            kind: SiteKind::Linkedin,
            name: LinkedinScraper::NAME,
            base_url: "https://www.linkedin.com/jobs".into(),
            file_prefix: "linkedin",
            missing_title_message: "Not on a LinkedIn job page",
            preview_fields: &[],
            extract: LinkedinScraper::scrape,
        },
        SiteProfile {
            kind: SiteKind::Indeed,
            name: IndeedScraper::NAME,
            base_url: "https://www.indeed.com".into(),
            file_prefix: "indeed",
            missing_title_message: "Not on an Indeed job page",
            preview_fields: &[],
            extract: IndeedScraper::scrape,
        },
    ]
}


/// The enabled sites, in the order they are matched against a page URL.
#[derive(Clone)]
pub(crate) struct SiteTable {
    profiles: Vec<SiteProfile>,
}


impl SiteTable {
    pub(crate) fn new(enabled_sites: &FxHashSet<String>, base_urls: &FxHashMap<String, String>) -> Self {
        let profiles = default_profiles()
            .into_iter()
            .filter(|x| enabled_sites.contains(x.name))
            .map(|mut x| {
                if let Some(base_url) = base_urls.get(x.name) {
                    x.base_url = base_url.clone();
                }
                x
            })
            .collect();
        Self { profiles }
    }

    pub(crate) fn profiles(&self) -> &[SiteProfile] {
        &self.profiles
    }

    /// Finds the site a page belongs to by URL prefix. `None` means the page is unsupported.
    pub(crate) fn detect(&self, url: &str) -> Option<&SiteProfile> {
        self.profiles.iter().find(|x| url.starts_with(&x.base_url))
    }
}


/// The state of one popup, from the moment it opens until it closes.
///
/// Extraction runs exactly once, when the session is opened. The resulting record is never
/// changed afterwards; the export timestamp is only added to the exported copy.
pub(crate) struct Session {
    site: Option<SiteProfile>,
    current_job: Option<JobRecord>,
}


impl Session {
    pub(crate) fn open(table: &SiteTable, page: &dyn PageAccessor) -> Self {
        let Some(site) = table.detect(page.url()) else {
            info!(url = page.url(), "Page is not on a supported job site");
            return Self { site: None, current_job: None };
        };
        debug!(site = site.name, url = page.url(), "Scraping page");
        let job = (site.extract)(page, &site.base_url);
        debug!(site = site.name, found_title = job.title.is_some(), "Scraped page");

        Self { site: Some(site.clone()), current_job: Some(job) }
    }

    pub(crate) fn site(&self) -> Option<&SiteProfile> {
        self.site.as_ref()
    }

    pub(crate) fn current_job(&self) -> Option<&JobRecord> {
        self.current_job.as_ref()
    }

    /// Exporting is only offered once a job title has been found.
    pub(crate) fn can_export(&self) -> bool {
        self.current_job.as_ref().is_some_and(|x| x.title.is_some())
    }

    /// A short multi-line summary of the captured job, or a message saying why there is none.
    pub(crate) fn preview(&self) -> String {
        let (Some(site), Some(job)) = (&self.site, &self.current_job) else {
            return UNSUPPORTED_MESSAGE.to_string();
        };
        let Some(title) = &job.title else {
            return site.missing_title_message.to_string();
        };

        let mut lines = vec![
            format!("Job ID: {}", job.job_id().unwrap_or("Not found")),
            format!("Title: {title}"),
        ];
        lines.extend(site.preview_fields.iter().map(|x| x.render(job)));
        lines.push(format!(
            "Description: {}",
            job.description
                .as_deref()
                .map(|x| truncate_words(x, PREVIEW_WORDS))
                .unwrap_or_else(|| "Not found".into())
        ));
        lines.join("\n")
    }

    /// Builds the file to download, stamped with `saved_at`.
    ///
    /// Returns `None` when there is nothing worth exporting.
    pub(crate) fn export(&self, saved_at: DateTime<Utc>) -> anyhow::Result<Option<Download>> {
        if !self.can_export() {
            return Ok(None);
        }
        let (Some(site), Some(job)) = (&self.site, &self.current_job) else {
            return Ok(None);
        };
        Download::new(site.file_prefix, job, saved_at).map(Some)
    }
}


/// The first `max_words` space-separated words of `text`, followed by an ellipsis.
///
/// Splits on single spaces, so runs of spaces count as empty words.
pub(crate) fn truncate_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split(' ').take(max_words).collect();
    format!("{}...", words.join(" "))
}
