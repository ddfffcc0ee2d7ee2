#[cfg(test)]
mod tests {
    use crate::pagination::{collect_pages, Page};
    use calbridge_common::{CalbridgeError, Result};
    use proptest::prelude::*;
    use std::cell::Cell;

    // Serves `total` numbered items in pages of `page_size`, counting fetches
    fn run_listing(
        total: usize,
        page_size: usize,
        max_results: Option<usize>,
    ) -> (Result<Vec<usize>>, usize) {
        let fetches = Cell::new(0usize);
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("Failed to build runtime");

        let result = runtime.block_on(collect_pages(max_results, |token: Option<String>| {
            fetches.set(fetches.get() + 1);
            let offset: usize = token.as_deref().map_or(0, |t| t.parse().unwrap_or(0));
            let end = (offset + page_size).min(total);
            let page = Page {
                items: (offset..end).collect(),
                next_page_token: (end < total).then(|| end.to_string()),
            };
            async move { Ok(page) }
        }));

        (result, fetches.get())
    }

    #[test]
    fn test_cap_below_first_page() {
        let (result, fetches) = run_listing(12, 10, Some(5));
        assert_eq!(result.unwrap(), (0..5).collect::<Vec<_>>());
        assert_eq!(fetches, 1);
    }

    #[test]
    fn test_cap_above_total() {
        let (result, fetches) = run_listing(12, 10, Some(15));
        assert_eq!(result.unwrap().len(), 12);
        assert_eq!(fetches, 2);
    }

    #[test]
    fn test_zero_cap_does_not_fetch() {
        let (result, fetches) = run_listing(12, 10, Some(0));
        assert!(result.unwrap().is_empty());
        assert_eq!(fetches, 0);
    }

    #[test]
    fn test_empty_token_ends_listing() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("Failed to build runtime");
        let fetches = Cell::new(0usize);

        let items = runtime
            .block_on(collect_pages(None, |_token| {
                fetches.set(fetches.get() + 1);
                async move {
                    Ok(Page {
                        items: vec![1, 2],
                        next_page_token: Some(String::new()),
                    })
                }
            }))
            .unwrap();

        assert_eq!(items, vec![1, 2]);
        assert_eq!(fetches.get(), 1);
    }

    #[test]
    fn test_error_aborts_listing() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("Failed to build runtime");

        let result: Result<Vec<u8>> = runtime.block_on(collect_pages(None, |token| async move {
            match token {
                None => Ok(Page {
                    items: vec![1],
                    next_page_token: Some("next".to_string()),
                }),
                Some(_) => Err(CalbridgeError::Transient("backend error".to_string())),
            }
        }));

        assert!(matches!(result, Err(CalbridgeError::Transient(_))));
    }

    proptest! {
        // The result never exceeds the cap and is as long as it can be
        #[test]
        fn test_result_length_is_capped(
            total in 0..60usize,
            page_size in 1..15usize,
            max_results in proptest::option::of(0..80usize),
        ) {
            let (result, _) = run_listing(total, page_size, max_results);
            let items = result.unwrap();

            let expected = max_results.map_or(total, |max| max.min(total));
            prop_assert_eq!(items.len(), expected);
            // Remote order is preserved
            prop_assert_eq!(items, (0..expected).collect::<Vec<_>>());
        }

        // No page is fetched once the cap is reached
        #[test]
        fn test_fetch_count_is_minimal(
            total in 0..60usize,
            page_size in 1..15usize,
            max_results in proptest::option::of(0..80usize),
        ) {
            let (_, fetches) = run_listing(total, page_size, max_results);

            let needed = max_results.map_or(total, |max| max.min(total));
            let expected = match max_results {
                Some(0) => 0,
                // An empty listing still takes one request to find out
                _ if needed == 0 => 1,
                _ => needed.div_ceil(page_size),
            };
            prop_assert_eq!(fetches, expected);
        }
    }
}
