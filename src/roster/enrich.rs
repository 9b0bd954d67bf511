// src/roster/enrich.rs
use std::path::Path;

use crate::Result;

use super::{
    author::Author,
    sheets::{find_sheet, list_institutions, read_sheet},
};

const ORCID_SPLIT: &str = ".org/";

/// Copy curated ORCID iDs from every institution sheet onto `authors` by
/// exact fullname. Returns how many authors changed.
pub fn enrich(authors: &mut [Author], institutions_dir: &Path, ambiguous: &[String]) -> Result<usize> {
    let mut updated = 0usize;

    for uni in list_institutions(institutions_dir)? {
        let Some(sheet) = find_sheet(&institutions_dir.join(&uni)) else { continue };
        let rows = match read_sheet(&sheet) {
            Ok(rows) => rows,
            Err(e) => {
                logw!("Enrich: skipping {}: {e}", sheet.display());
                continue;
            }
        };

        for row in rows {
            if row.checked == Some(false) || ambiguous.contains(&row.fullname) {
                continue;
            }
            let Some(orcid) = row
                .orcid
                .as_deref()
                .and_then(|o| o.split_once(ORCID_SPLIT))
                .map(|(_, id)| id.trim())
                .filter(|id| !id.is_empty())
            else {
                continue;
            };

            for a in authors.iter_mut().filter(|a| a.fullname == row.fullname) {
                if a.orcid.as_deref() != Some(orcid) {
                    a.orcid = Some(s!(orcid));
                    updated += 1;
                }
            }
        }
    }

    logf!("Enrich: {updated} authors got an ORCID iD");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn author(name: &str) -> Author {
        Author { fullname: s!(name), ..Author::default() }
    }

    #[test]
    fn only_checked_unambiguous_orcid_rows_count() {
        let dir = tempfile::tempdir().unwrap();
        let uni = dir.path().join("SWPS");
        fs::create_dir_all(&uni).unwrap();
        fs::write(
            uni.join("names.csv"),
            "fullname,orcid,Checked\n\
             Jan Kowalski,https://orcid.org/0000-0001-2345-6789,1\n\
             Ewa Nowak,https://orcid.org/0000-0002-0000-0001,0\n\
             Ola Lis,https://orcid.org/0000-0003-0000-0002,\n\
             Adam Mazur,not found,1\n\
             Paulina Michalska,https://orcid.org/0000-0003-2703-158X,1\n",
        )
        .unwrap();

        let mut authors: Vec<Author> =
            ["Jan Kowalski", "Ewa Nowak", "Ola Lis", "Adam Mazur", "Paulina Michalska"]
                .into_iter()
                .map(author)
                .collect();
        let n = enrich(&mut authors, dir.path(), &strs!["Paulina Michalska"]).unwrap();

        assert_eq!(n, 2);
        assert_eq!(authors[0].orcid.as_deref(), Some("0000-0001-2345-6789"));
        assert_eq!(authors[1].orcid, None);
        // blank Checked is not an explicit "no"
        assert_eq!(authors[2].orcid.as_deref(), Some("0000-0003-0000-0002"));
        assert_eq!(authors[3].orcid, None);
        assert_eq!(authors[4].orcid, None);
    }
}
