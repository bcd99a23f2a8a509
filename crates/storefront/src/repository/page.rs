//! Paging and sorting for list queries.

use std::cmp::Ordering;

use common::protocol::{Page, PageQuery, SortOrder};
use common::ServiceError;

/// A resource's sortable columns, addressed by their wire names.
pub trait SortField: Sized + Copy + Send + Sync + 'static {
    /// Column used when the request names none.
    const DEFAULT: Self;

    fn parse(name: &str) -> Option<Self>;
}

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRequest<S> {
    /// Zero-based page index.
    pub page_number: u32,
    pub page_size: u32,
    pub sort: S,
    pub order: SortOrder,
}

#[cfg(test)]
impl<S: SortField> PageRequest<S> {
    pub fn first(page_size: u32) -> Self {
        Self {
            page_number: 0,
            page_size,
            sort: S::DEFAULT,
            order: SortOrder::Asc,
        }
    }
}

/// Page-size policy applied to raw query strings.
#[derive(Debug, Clone, Copy)]
pub struct Paging {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Paging {
    /// Turn a raw [`PageQuery`] into a [`PageRequest`] for the sort columns `S`.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Api`] for a zero page size, an unknown sort column, or
    /// an unknown sort direction.
    pub fn resolve<S: SortField>(&self, query: &PageQuery) -> Result<PageRequest<S>, ServiceError> {
        let page_size = query.page_size.unwrap_or(self.default_page_size);
        if page_size == 0 {
            return Err(ServiceError::api("pageSize must be greater than 0"));
        }
        let sort = match query.sort_by.as_deref() {
            None => S::DEFAULT,
            Some(name) => S::parse(name)
                .ok_or_else(|| ServiceError::api(format!("Invalid sort field: {name}")))?,
        };
        let order = match query.sort_order.as_deref() {
            None => SortOrder::Asc,
            Some(s) => SortOrder::parse(s)
                .ok_or_else(|| ServiceError::api(format!("Invalid sort order: {s}")))?,
        };
        Ok(PageRequest {
            page_number: query.page_number.unwrap_or(0),
            page_size: page_size.min(self.max_page_size),
            sort,
            order,
        })
    }
}

/// Sort `items` by `cmp`, reversed for [`SortOrder::Desc`].
pub fn sort_by<T>(items: &mut [T], order: SortOrder, cmp: impl Fn(&T, &T) -> Ordering) {
    match order {
        SortOrder::Asc => items.sort_by(|a, b| cmp(a, b)),
        SortOrder::Desc => items.sort_by(|a, b| cmp(b, a)),
    }
}

/// Cut one page out of an already sorted result set.
pub fn paginate<T, S>(items: Vec<T>, req: &PageRequest<S>) -> Page<T> {
    let total_elements = items.len() as u64;
    let size = u64::from(req.page_size.max(1));
    let total_pages = total_elements.div_ceil(size) as u32;
    let skip = u64::from(req.page_number).saturating_mul(size) as usize;
    let content = items.into_iter().skip(skip).take(size as usize).collect();
    Page {
        content,
        page_number: req.page_number,
        page_size: req.page_size,
        total_elements,
        total_pages,
        last_page: req.page_number.saturating_add(1) >= total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Col {
        Id,
        Name,
    }

    impl SortField for Col {
        const DEFAULT: Self = Col::Id;

        fn parse(name: &str) -> Option<Self> {
            match name {
                "id" => Some(Col::Id),
                "name" => Some(Col::Name),
                _ => None,
            }
        }
    }

    const PAGING: Paging = Paging {
        default_page_size: 50,
        max_page_size: 100,
    };

    #[test]
    fn resolve_applies_defaults() {
        let req: PageRequest<Col> = PAGING.resolve(&PageQuery::default()).unwrap();
        assert_eq!(req, PageRequest::first(50));
    }

    #[test]
    fn resolve_caps_page_size() {
        let q = PageQuery {
            page_size: Some(10_000),
            ..Default::default()
        };
        let req: PageRequest<Col> = PAGING.resolve(&q).unwrap();
        assert_eq!(req.page_size, 100);
    }

    #[test]
    fn resolve_rejects_bad_input() {
        let zero = PageQuery {
            page_size: Some(0),
            ..Default::default()
        };
        assert!(PAGING.resolve::<Col>(&zero).is_err());

        let bad_col = PageQuery {
            sort_by: Some("price".into()),
            ..Default::default()
        };
        let err = PAGING.resolve::<Col>(&bad_col).unwrap_err();
        assert_eq!(err.to_string(), "Invalid sort field: price");

        let bad_dir = PageQuery {
            sort_order: Some("up".into()),
            ..Default::default()
        };
        assert!(PAGING.resolve::<Col>(&bad_dir).is_err());
    }

    #[test]
    fn resolve_reads_sort_column_and_direction() {
        let q = PageQuery {
            page_number: Some(2),
            page_size: Some(5),
            sort_by: Some("name".into()),
            sort_order: Some("DESC".into()),
        };
        let req: PageRequest<Col> = PAGING.resolve(&q).unwrap();
        assert_eq!(req.sort, Col::Name);
        assert_eq!(req.order, SortOrder::Desc);
        assert_eq!(req.page_number, 2);
    }

    #[test]
    fn paginate_middle_and_last_pages() {
        let items: Vec<u32> = (1..=7).collect();
        let mut req = PageRequest {
            page_number: 1,
            page_size: 3,
            sort: Col::Id,
            order: SortOrder::Asc,
        };
        let page = paginate(items.clone(), &req);
        assert_eq!(page.content, vec![4, 5, 6]);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_elements, 7);
        assert!(!page.last_page);

        req.page_number = 2;
        let page = paginate(items, &req);
        assert_eq!(page.content, vec![7]);
        assert!(page.last_page);
    }

    #[test]
    fn paginate_empty_and_out_of_range() {
        let req = PageRequest::<Col>::first(10);
        let page = paginate(Vec::<u32>::new(), &req);
        assert_eq!(page.total_pages, 0);
        assert!(page.last_page);

        let far = PageRequest {
            page_number: u32::MAX,
            ..req
        };
        let page = paginate(vec![1, 2, 3], &far);
        assert!(page.content.is_empty());
        assert!(page.last_page);
    }

    #[test]
    fn sort_by_respects_direction() {
        let mut v = vec![2, 3, 1];
        sort_by(&mut v, SortOrder::Desc, |a, b| a.cmp(b));
        assert_eq!(v, vec![3, 2, 1]);
        sort_by(&mut v, SortOrder::Asc, |a, b| a.cmp(b));
        assert_eq!(v, vec![1, 2, 3]);
    }
}
