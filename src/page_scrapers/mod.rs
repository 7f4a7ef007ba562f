use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use tracing::debug;
use url::Url;

pub(crate) use self::{indeed::IndeedScraper, linkedin::LinkedinScraper, seek::SeekScraper};

mod indeed;
mod linkedin;
mod seek;


pub(crate) const DEFAULT_SCRAPERS: [&str; 3] = [SeekScraper::NAME, LinkedinScraper::NAME, IndeedScraper::NAME];


/// The fields of a single job posting that could be read off a page.
///
/// Every field is optional. A missing field means it was not found on the page, and a record
/// without a `title` is how callers tell that the page was not a job page at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JobRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) salary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) advertiser: Option<String>,
    /// The absolute URL of the posting itself, when the title links to it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) job_url: Option<String>,
    /// The URL of the page the posting was captured from, which may be a search results page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) search_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) linkedin_job_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) indeed_job_id: Option<String>,
}


impl JobRecord {
    /// Whichever job id the scraper managed to find, regardless of the field it is stored under.
    pub(crate) fn job_id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .or(self.linkedin_job_id.as_deref())
            .or(self.indeed_job_id.as_deref())
    }
}


/// A link found inside a marked region of a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PageLink {
    pub(crate) text: Option<String>,
    /// The raw `href` attribute, which may be relative.
    pub(crate) href: Option<String>,
}


/// Read-only access to a rendered page.
///
/// Markers are CSS selectors. Only the first element matching a marker is ever considered,
/// and a marker that matches nothing (or does not parse) reads as absent.
pub(crate) trait PageAccessor {
    /// The URL of the page, exactly as the browser reported it.
    fn url(&self) -> &str;

    /// The cleaned text content of the first element matching `marker`.
    fn text(&self, marker: &str) -> Option<String>;

    /// The first link nested inside the first element matching `marker`.
    fn link_within(&self, marker: &str) -> Option<PageLink>;
}


/// A page snapshot parsed from HTML
pub(crate) struct HtmlPage {
    document: Html,
    url: String,
}


impl HtmlPage {
    pub(crate) fn parse(html: &str, url: impl Into<String>) -> Self {
        Self { document: Html::parse_document(html), url: url.into() }
    }

    fn first(&self, marker: &str) -> Option<ElementRef<'_>> {
        let selector = match Selector::parse(marker) {
            Ok(x) => x,
            Err(e) => {
                debug!(marker, error = ?e, "Ignoring unparseable marker");
                return None;
            }
        };
        self.document.select(&selector).next()
    }
}


impl PageAccessor for HtmlPage {
    fn url(&self) -> &str {
        &self.url
    }

    fn text(&self, marker: &str) -> Option<String> {
        self.first(marker).and_then(|x| clean_text(&x.text().collect::<String>()))
    }

    fn link_within(&self, marker: &str) -> Option<PageLink> {
        let anchor = Selector::parse("a").ok()?;
        let link = self.first(marker)?.select(&anchor).next()?;
        Some(PageLink {
            text: clean_text(&link.text().collect::<String>()),
            href: link.value().attr("href").map(str::to_string),
        })
    }
}


/// Trims the text and swaps non-breaking spaces for regular ones. Blank text is treated as missing.
pub(crate) fn clean_text(raw: &str) -> Option<String> {
    let text = raw.replace('\u{a0}', " ");
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}


/// Reads a query parameter from `url`. Malformed URLs and empty values read as absent.
pub(crate) fn query_param(url: &str, key: &str) -> Option<String> {
    let url = match Url::parse(url) {
        Ok(x) => x,
        Err(e) => {
            debug!(url, error = %e, "Could not parse page URL");
            return None;
        }
    };
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}


pub(crate) trait PageScraper {
    const NAME: &'static str;

    /// Scrapes a job posting off the given page.
    ///
    /// `base_url` is the site's canonical base URL, used to resolve relative links.
    ///
    /// This never fails. Anything that cannot be found is left empty in the returned record,
    /// and a page from an entirely different website yields a record with nothing but
    /// URL-derived fields.
    fn scrape(page: &dyn PageAccessor, base_url: &str) -> JobRecord;
}




#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_page_reads_first_match_trimmed() {
        let page = HtmlPage::parse(
            "<html><body><h1>\n  Senior\u{a0}Engineer  </h1><h1>Second</h1></body></html>",
            "https://example.com/",
        );
        assert_eq!(page.text("h1").as_deref(), Some("Senior Engineer"));
        assert_eq!(page.url(), "https://example.com/");
    }

    #[test]
    fn html_page_missing_and_blank_regions_are_absent() {
        let page = HtmlPage::parse("<div id=\"empty\">   </div>", "https://example.com/");
        assert_eq!(page.text("#empty"), None);
        assert_eq!(page.text("#nowhere"), None);
        assert_eq!(page.text("[[not a selector"), None);
        assert_eq!(page.link_within("#empty"), None);
    }

    #[test]
    fn html_page_finds_nested_link() {
        let page = HtmlPage::parse(
            "<h2 class=\"t\"><span><a href=\"/job/5\"> Role </a></span></h2>",
            "https://example.com/",
        );
        let link = page.link_within(".t").unwrap();
        assert_eq!(link.text.as_deref(), Some("Role"));
        assert_eq!(link.href.as_deref(), Some("/job/5"));
    }

    #[test]
    fn query_param_degrades_on_bad_input() {
        assert_eq!(query_param("https://x.test/?a=1&b=2", "b").as_deref(), Some("2"));
        assert_eq!(query_param("https://x.test/?a=", "a"), None);
        assert_eq!(query_param("https://x.test/", "a"), None);
        assert_eq!(query_param("not a url at all", "a"), None);
        assert_eq!(query_param("", "a"), None);
    }

    #[test]
    fn job_id_prefers_generic_id() {
        let record = JobRecord {
            linkedin_job_id: Some("li".into()),
            ..Default::default()
        };
        assert_eq!(record.job_id(), Some("li"));

        let record = JobRecord {
            id: Some("seek".into()),
            indeed_job_id: Some("in".into()),
            ..Default::default()
        };
        assert_eq!(record.job_id(), Some("seek"));
        assert_eq!(JobRecord::default().job_id(), None);
    }

    #[test]
    fn absent_fields_are_left_out_of_json() {
        let record = JobRecord {
            title: Some("Engineer".into()),
            job_url: Some("https://x.test/job/1".into()),
            indeed_job_id: Some("abc".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "title": "Engineer", "jobUrl": "https://x.test/job/1", "indeedJobId": "abc" })
        );
    }
}
