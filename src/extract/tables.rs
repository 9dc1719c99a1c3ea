use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::text::clean_cell;
use crate::models::{StaffTable, SubsidyTable};

static GRID: LazyLock<Selector> = LazyLock::new(|| Selector::parse("mat-table").expect("valid selector"));
static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("mat-row").expect("valid selector"));
static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("mat-cell").expect("valid selector"));

/// 面板上第一个表格：补贴
const SUBSIDY_GRID: usize = 0;
/// 面板上第二个表格：人员和工资
const STAFF_GRID: usize = 1;

/// 补贴表（年份、金额）
///
/// 面板上没有表格时返回 `None`。
pub fn parse_subsidies(doc: &Html) -> Option<SubsidyTable> {
    let rows = grid_rows(doc, SUBSIDY_GRID, 2)?;
    let mut table = SubsidyTable::default();
    for [year, subsidy] in rows.into_iter().map(into_columns::<2>) {
        table.year.push(year);
        table.subsidy.push(subsidy);
    }
    Some(table)
}

/// 人员表（年份、员工数、平均工资）
///
/// 面板上少于两个表格时返回 `None`。
pub fn parse_staff(doc: &Html) -> Option<StaffTable> {
    let rows = grid_rows(doc, STAFF_GRID, 3)?;
    let mut table = StaffTable::default();
    for [year, employees, mean_salary] in rows.into_iter().map(into_columns::<3>) {
        table.year.push(year);
        table.employees.push(employees);
        table.mean_salary.push(mean_salary);
    }
    Some(table)
}

/// 第 `index` 个表格的所有行，每行取前 `columns` 个单元格
///
/// 单元格不足时补空字符串，保证每一列长度都等于行数。
fn grid_rows(doc: &Html, index: usize, columns: usize) -> Option<Vec<Vec<String>>> {
    let grid = doc.select(&GRID).nth(index)?;
    Some(grid.select(&ROW).map(|row| row_cells(row, columns)).collect())
}

fn row_cells(row: ElementRef<'_>, columns: usize) -> Vec<String> {
    let mut cells: Vec<String> = row
        .select(&CELL)
        .take(columns)
        .map(|cell| clean_cell(&cell.text().collect::<String>()))
        .collect();
    cells.resize(columns, String::new());
    cells
}

fn into_columns<const N: usize>(cells: Vec<String>) -> [String; N] {
    let mut cells = cells.into_iter();
    std::array::from_fn(|_| cells.next().unwrap_or_default())
}
