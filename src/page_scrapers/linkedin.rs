use super::{query_param, JobRecord, PageAccessor, PageScraper};

const TITLE: &str = "h1";
const DESCRIPTION: &str = "#job-details";

/// A scraper for LinkedIn job listings
#[derive(Default)]
pub(crate) struct LinkedinScraper;

impl PageScraper for LinkedinScraper {
    const NAME: &'static str = "linkedin";

    fn scrape(page: &dyn PageAccessor, _base_url: &str) -> JobRecord {
        JobRecord {
            title: page.text(TITLE),
            description: page.text(DESCRIPTION),
            linkedin_job_id: query_param(page.url(), "currentJobId"),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_scrapers::HtmlPage;

    const BASE: &str = "https://www.linkedin.com/jobs";

    #[test]
    fn search_page_with_selected_job() {
        let html = r#"
            <main>
              <h1 class="t-24"><a href="/jobs/view/3901234567/">Backend Engineer (Rust)</a></h1>
              <div id="job-details"><span>About the job</span> We ship things.</div>
            </main>
        "#;
        let url = "https://www.linkedin.com/jobs/search/?currentJobId=3901234567&keywords=rust";
        let record = LinkedinScraper::scrape(&HtmlPage::parse(html, url), BASE);
        assert_eq!(
            record,
            JobRecord {
                title: Some("Backend Engineer (Rust)".into()),
                description: Some("About the job We ship things.".into()),
                linkedin_job_id: Some("3901234567".into()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn id_only_comes_from_the_query() {
        let url = "https://www.linkedin.com/jobs/view/3901234567/";
        let record = LinkedinScraper::scrape(&HtmlPage::parse("<h1>Engineer</h1>", url), BASE);
        assert_eq!(record.title.as_deref(), Some("Engineer"));
        assert_eq!(record.linkedin_job_id, None);
        assert_eq!(record.id, None);
    }

    #[test]
    fn unrelated_or_malformed_page_is_empty() {
        let record = LinkedinScraper::scrape(&HtmlPage::parse("<p>feed</p>", "https://www.linkedin.com/jobs/"), BASE);
        assert_eq!(record, JobRecord::default());

        let record = LinkedinScraper::scrape(&HtmlPage::parse("", "not a url?currentJobId=1"), BASE);
        assert_eq!(record, JobRecord::default());
    }
}
