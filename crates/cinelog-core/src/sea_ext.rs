use cinelog_domain::pagination::{PageRequest, Sort};
use sea_orm::{
    ColumnTrait, Order, QueryOrder, QuerySelect,
    sea_query::{Expr, Func, LikeExpr, SimpleExpr},
};

/// `Sort` as a sea-orm `Order`.
pub fn order_of(sort: Sort) -> Order {
    match sort {
        Sort::Asc => Order::Asc,
        Sort::Desc => Order::Desc,
    }
}

/// Escape `%`, `_` and `\` so `term` matches literally inside a LIKE pattern.
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Case-insensitive substring match of `term` against `col`.
pub fn contains_ci<C: ColumnTrait>(col: C, term: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
    Expr::expr(Func::lower(col.into_expr())).like(LikeExpr::new(pattern).escape('\\'))
}

/// Sorting and paging shorthands for listing queries.
pub trait SelectListExt: Sized {
    /// Order by `col` in `sort` direction, then by `tiebreak` for a stable page
    /// boundary.
    fn sorted_by<C: ColumnTrait, T: ColumnTrait>(self, col: C, sort: Sort, tiebreak: T) -> Self;

    /// Apply `LIMIT`/`OFFSET` for one page.
    fn paged(self, request: PageRequest) -> Self;
}

impl<Q> SelectListExt for Q
where
    Q: QueryOrder + QuerySelect,
{
    fn sorted_by<C: ColumnTrait, T: ColumnTrait>(self, col: C, sort: Sort, tiebreak: T) -> Self {
        let order = order_of(sort);
        self.order_by(col, order.clone()).order_by(tiebreak, order)
    }

    fn paged(self, request: PageRequest) -> Self {
        self.offset(request.offset()).limit(u64::from(request.limit))
    }
}
