use thiserror::Error;

/// Columns a listing may be ordered by. The chosen field is interpolated into
/// ORDER BY, so anything outside this list is rejected before it reaches SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Title,
    Owner,
}

impl SortField {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "id" => Some(SortField::Id),
            "title" => Some(SortField::Title),
            "owner" => Some(SortField::Owner),
            _ => None,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Title => "title",
            SortField::Owner => "owner",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("asc") {
            Some(SortDirection::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Some(SortDirection::Desc)
        } else {
            None
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageParamError {
    #[error("page must be zero or positive")]
    NegativePage,
    #[error("size must be positive")]
    NonPositiveSize,
    #[error("unknown sort field '{0}'")]
    UnknownSortField(String),
    #[error("direction must be 'asc' or 'desc', got '{0}'")]
    InvalidDirection(String),
}

/// Validated paging and ordering for a listing request.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub page: i64,
    pub size: i64,
    pub sort: SortField,
    pub direction: SortDirection,
}

impl PageRequest {
    pub const DEFAULT_SIZE: i64 = 2;

    /// Map raw query parameters onto a validated request. Absent parameters
    /// fall back to page 0, the default size, and id ascending.
    pub fn from_query(
        page: Option<i64>,
        size: Option<i64>,
        sort: Option<&str>,
        direction: Option<&str>,
    ) -> Result<Self, PageParamError> {
        let page = page.unwrap_or(0);
        if page < 0 {
            return Err(PageParamError::NegativePage);
        }

        let size = size.unwrap_or(Self::DEFAULT_SIZE);
        if size <= 0 {
            return Err(PageParamError::NonPositiveSize);
        }

        let sort = match sort {
            Some(value) => SortField::parse(value)
                .ok_or_else(|| PageParamError::UnknownSortField(value.to_string()))?,
            None => SortField::Id,
        };

        let direction = match direction {
            Some(value) => SortDirection::parse(value)
                .ok_or_else(|| PageParamError::InvalidDirection(value.to_string()))?,
            None => SortDirection::Asc,
        };

        Ok(Self { page, size, sort, direction })
    }

    pub fn limit(&self) -> i64 {
        self.size
    }

    pub fn offset(&self) -> i64 {
        // Saturates so an absurd page lands past the data instead of
        // overflowing.
        self.page.saturating_mul(self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page_sorted_by_id_ascending() {
        let page = PageRequest::from_query(None, None, None, None).unwrap();
        assert_eq!(page.page, 0);
        assert_eq!(page.size, PageRequest::DEFAULT_SIZE);
        assert_eq!(page.sort, SortField::Id);
        assert_eq!(page.direction, SortDirection::Asc);
    }

    #[test]
    fn computes_limit_and_offset() {
        let page = PageRequest::from_query(Some(3), Some(10), None, None).unwrap();
        assert_eq!(page.limit(), 10);
        assert_eq!(page.offset(), 30);
    }

    #[test]
    fn huge_pages_saturate_instead_of_overflowing() {
        let page = PageRequest::from_query(Some(i64::MAX), Some(2), None, None).unwrap();
        assert_eq!(page.limit(), 2);
        assert_eq!(page.offset(), i64::MAX);

        let page = PageRequest::from_query(Some(2), Some(i64::MAX), None, None).unwrap();
        assert_eq!(page.offset(), i64::MAX);
    }

    #[test]
    fn direction_is_case_insensitive() {
        let page = PageRequest::from_query(None, None, Some("title"), Some("DESC")).unwrap();
        assert_eq!(page.sort, SortField::Title);
        assert_eq!(page.direction, SortDirection::Desc);
    }

    #[test]
    fn rejects_negative_page() {
        let err = PageRequest::from_query(Some(-1), None, None, None).unwrap_err();
        assert_eq!(err, PageParamError::NegativePage);
    }

    #[test]
    fn rejects_zero_or_negative_size() {
        assert_eq!(
            PageRequest::from_query(None, Some(0), None, None).unwrap_err(),
            PageParamError::NonPositiveSize
        );
        assert_eq!(
            PageRequest::from_query(None, Some(-5), None, None).unwrap_err(),
            PageParamError::NonPositiveSize
        );
    }

    #[test]
    fn rejects_unknown_sort_field() {
        let err =
            PageRequest::from_query(None, None, Some("password"), None).unwrap_err();
        assert_eq!(err, PageParamError::UnknownSortField("password".to_string()));
    }

    #[test]
    fn rejects_unknown_direction() {
        let err = PageRequest::from_query(None, None, None, Some("sideways")).unwrap_err();
        assert_eq!(err, PageParamError::InvalidDirection("sideways".to_string()));
    }
}
