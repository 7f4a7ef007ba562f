use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use url::Url;

use super::{JobRecord, PageAccessor, PageScraper};

const TITLE: &str = "[data-automation=\"job-detail-title\"]";
const LOCATION: &str = "[data-automation=\"job-detail-location\"]";
const SALARY: &str = "[data-automation=\"job-detail-salary\"]";
const DESCRIPTION: &str = "[data-automation=\"jobAdDetails\"]";
const ADVERTISER: &str = "[data-automation=\"advertiser-name\"]";

static JOB_PATH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/job/(\d+)").unwrap());

/// A scraper for Seek job sites
#[derive(Default)]
pub(crate) struct SeekScraper;

impl PageScraper for SeekScraper {
    const NAME: &'static str = "seek";

    fn scrape(page: &dyn PageAccessor, base_url: &str) -> JobRecord {
        // Search results show the selected job in a side panel whose title links to the job itself.
        let (title, job_url) = match page.link_within(TITLE) {
            Some(link) => (link.text, link.href.and_then(|href| resolve_href(base_url, &href))),
            None => (page.text(TITLE), None),
        };

        JobRecord {
            id: job_id(page.url()),
            title,
            location: page.text(LOCATION),
            salary: page.text(SALARY),
            description: page.text(DESCRIPTION),
            advertiser: page.text(ADVERTISER),
            job_url,
            search_url: Some(page.url().to_string()).filter(|x| !x.is_empty()),
            ..Default::default()
        }
    }
}

/// `jobId` from the query string wins, otherwise a `/job/<digits>` path segment.
fn job_id(page_url: &str) -> Option<String> {
    let url = Url::parse(page_url).ok()?;
    if let Some((_, id)) = url.query_pairs().find(|(k, v)| k == "jobId" && !v.is_empty()) {
        return Some(id.into_owned());
    }
    JOB_PATH_RE
        .captures(url.path())
        .map(|caps| caps[1].to_string())
}

fn resolve_href(base_url: &str, href: &str) -> Option<String> {
    let resolved = Url::parse(base_url).and_then(|base| base.join(href));
    match resolved {
        Ok(x) => Some(x.to_string()),
        Err(e) => {
            debug!(base_url, href, error = %e, "Could not resolve job link");
            None
        }
    }
}
