use super::{query_param, JobRecord, PageAccessor, PageScraper};

const TITLE: &str = "h1";
const DESCRIPTION: &str = "#jobDescriptionText";

/// A scraper for Indeed job listings
#[derive(Default)]
pub(crate) struct IndeedScraper;

impl PageScraper for IndeedScraper {
    const NAME: &'static str = "indeed";

    fn scrape(page: &dyn PageAccessor, _base_url: &str) -> JobRecord {
        JobRecord {
            title: page.text(TITLE),
            description: page.text(DESCRIPTION),
            indeed_job_id: query_param(page.url(), "vjk"),
            ..Default::default()
        }
    }
}
