//! Implements a budget store that keeps everything in memory.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
};

use rust_decimal::Decimal;
use time::OffsetDateTime;

use crate::{
    Error,
    board::{BoardData, BudgetLineWithActual},
    budget_line::{
        ActualLine, ActualLineId, BudgetLine, BudgetLineEdit, BudgetLineId, MonthBudgetLine,
        NewBudgetLine, validate_actual,
    },
    category::{Category, CategoryId, NewCategory},
    database_id::DatabaseId,
    month::{FinalizeEligibility, Month, MonthId, next_calendar_month},
    report::{AnnualSnap, AnnualSnapId, AnnualSnapMeta},
    stores::BudgetStore,
};

/// A budget store backed by in-memory collections.
///
/// Behaves like [SQLiteBudgetStore](crate::stores::SQLiteBudgetStore),
/// including its error cases, and is intended for tests and demos.
/// Multi-record operations work on a copy of the state that replaces the
/// original only when every step succeeds.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBudgetStore {
    state: Arc<Mutex<State>>,
}

#[derive(Debug, Clone, Default)]
struct State {
    last_id: DatabaseId,
    categories: BTreeMap<CategoryId, Category>,
    months: BTreeMap<MonthId, Month>,
    budget_lines: BTreeMap<BudgetLineId, BudgetLine>,
    actual_lines: BTreeMap<ActualLineId, ActualLine>,
    snapshots: BTreeMap<AnnualSnapId, AnnualSnap>,
}

impl State {
    fn next_id(&mut self) -> DatabaseId {
        self.last_id += 1;
        self.last_id
    }

    fn actual_for(&self, budget_line_id: BudgetLineId) -> Option<&ActualLine> {
        self.actual_lines
            .values()
            .find(|actual| actual.budget_line_id == budget_line_id)
    }

    fn insert_month(&mut self, year: i32, month: u8) -> Result<Month, Error> {
        let exists = self
            .months
            .values()
            .any(|existing| existing.year == year && existing.month == month);
        if exists {
            return Err(Error::DuplicateMonth);
        }

        let month = Month {
            id: self.next_id(),
            year,
            month,
            finalized: false,
        };
        self.months.insert(month.id, month.clone());

        Ok(month)
    }

    fn insert_budget_line(
        &mut self,
        month_id: MonthId,
        category_id: CategoryId,
        label: String,
        expected: Decimal,
    ) -> BudgetLineId {
        let budget_line_id = self.next_id();
        self.budget_lines.insert(
            budget_line_id,
            BudgetLine {
                id: budget_line_id,
                month_id,
                category_id,
                label,
                expected,
            },
        );

        let actual_line_id = self.next_id();
        self.actual_lines.insert(
            actual_line_id,
            ActualLine {
                id: actual_line_id,
                budget_line_id,
                actual: Decimal::ZERO,
            },
        );

        budget_line_id
    }
}

impl InMemoryBudgetStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, Error> {
        self.state.lock().map_err(|error| {
            tracing::error!("could not acquire in-memory store lock: {error}");
            Error::DatabaseLockError
        })
    }

    /// Apply `change` to a copy of the state, keeping the copy only on success.
    fn transaction<T>(
        &self,
        change: impl FnOnce(&mut State) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let mut state = self.lock()?;
        let mut draft = state.clone();
        let result = change(&mut draft)?;
        *state = draft;

        Ok(result)
    }
}

impl BudgetStore for InMemoryBudgetStore {
    fn get_all_categories(&self) -> Result<Vec<Category>, Error> {
        let mut categories: Vec<Category> = self.lock()?.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        Ok(categories)
    }

    fn get_category(&self, category_id: CategoryId) -> Result<Category, Error> {
        self.lock()?
            .categories
            .get(&category_id)
            .cloned()
            .ok_or(Error::NotFound)
    }

    fn create_category(&self, category: NewCategory) -> Result<Category, Error> {
        self.transaction(|state| {
            if state
                .categories
                .values()
                .any(|existing| existing.name == category.name)
            {
                return Err(Error::DuplicateCategoryName);
            }

            let category = Category {
                id: state.next_id(),
                name: category.name,
                color: category.color,
            };
            state.categories.insert(category.id, category.clone());

            Ok(category)
        })
    }

    fn update_category(&self, category: &Category) -> Result<(), Error> {
        self.transaction(|state| {
            if !state.categories.contains_key(&category.id) {
                return Err(Error::UpdateMissingCategory);
            }

            if state
                .categories
                .values()
                .any(|existing| existing.id != category.id && existing.name == category.name)
            {
                return Err(Error::DuplicateCategoryName);
            }

            state.categories.insert(category.id, category.clone());

            Ok(())
        })
    }

    fn delete_category(&self, category_id: CategoryId) -> Result<(), Error> {
        self.transaction(|state| {
            let line_count = state
                .budget_lines
                .values()
                .filter(|line| line.category_id == category_id)
                .count() as i64;

            if line_count > 0 {
                return Err(Error::CategoryInUse(line_count));
            }

            state
                .categories
                .remove(&category_id)
                .map(|_| ())
                .ok_or(Error::DeleteMissingCategory)
        })
    }

    fn get_month(&self, month_id: MonthId) -> Result<Month, Error> {
        self.lock()?
            .months
            .get(&month_id)
            .cloned()
            .ok_or(Error::NotFound)
    }

    fn get_current_month(&self) -> Result<Month, Error> {
        self.lock()?
            .months
            .values()
            .filter(|month| !month.finalized)
            .max_by_key(|month| (month.year, month.month))
            .cloned()
            .ok_or(Error::NotFound)
    }

    fn get_all_months(&self) -> Result<Vec<Month>, Error> {
        let mut months: Vec<Month> = self.lock()?.months.values().cloned().collect();
        months.sort_by_key(|month| (month.year, month.month));

        Ok(months)
    }

    fn create_month(&self, year: i32, month: u8) -> Result<Month, Error> {
        self.transaction(|state| state.insert_month(year, month))
    }

    fn create_budget_line(&self, line: NewBudgetLine) -> Result<BudgetLineId, Error> {
        self.transaction(|state| {
            if !state.months.contains_key(&line.month_id)
                || !state.categories.contains_key(&line.category_id)
            {
                return Err(Error::InvalidForeignKey);
            }

            Ok(state.insert_budget_line(line.month_id, line.category_id, line.label, line.expected))
        })
    }

    fn get_budget_line(&self, budget_line_id: BudgetLineId) -> Result<BudgetLine, Error> {
        self.lock()?
            .budget_lines
            .get(&budget_line_id)
            .cloned()
            .ok_or(Error::NotFound)
    }

    fn get_budget_lines_by_month(&self, month_id: MonthId) -> Result<Vec<MonthBudgetLine>, Error> {
        let state = self.lock()?;

        Ok(state
            .budget_lines
            .values()
            .filter(|line| line.month_id == month_id)
            .map(|line| {
                let actual = state.actual_for(line.id);

                MonthBudgetLine {
                    id: line.id,
                    month_id: line.month_id,
                    category_id: line.category_id,
                    label: line.label.clone(),
                    expected: line.expected,
                    actual_id: actual.map(|actual| actual.id),
                    actual: actual.map(|actual| actual.actual),
                }
            })
            .collect())
    }

    fn update_budget_line(
        &self,
        budget_line_id: BudgetLineId,
        edit: &BudgetLineEdit,
    ) -> Result<(), Error> {
        self.transaction(|state| {
            let line = state
                .budget_lines
                .get_mut(&budget_line_id)
                .ok_or(Error::UpdateMissingBudgetLine)?;
            line.label = edit.label.clone();
            line.expected = edit.expected;

            Ok(())
        })
    }

    fn delete_budget_line(&self, budget_line_id: BudgetLineId) -> Result<(), Error> {
        self.transaction(|state| {
            state
                .actual_lines
                .retain(|_, actual| actual.budget_line_id != budget_line_id);

            state
                .budget_lines
                .remove(&budget_line_id)
                .map(|_| ())
                .ok_or(Error::DeleteMissingBudgetLine)
        })
    }

    fn get_actual_line(&self, actual_line_id: ActualLineId) -> Result<ActualLine, Error> {
        self.lock()?
            .actual_lines
            .get(&actual_line_id)
            .cloned()
            .ok_or(Error::NotFound)
    }

    fn update_actual_line(
        &self,
        actual_line_id: ActualLineId,
        actual: Decimal,
    ) -> Result<ActualLine, Error> {
        let actual = validate_actual(actual)?;

        self.transaction(|state| {
            let line = state
                .actual_lines
                .get_mut(&actual_line_id)
                .ok_or(Error::UpdateMissingActualLine)?;
            line.actual = actual;

            Ok(line.clone())
        })
    }

    fn get_board_data(&self, month_id: MonthId) -> Result<BoardData, Error> {
        let state = self.lock()?;
        let month = state.months.get(&month_id).ok_or(Error::NotFound)?;

        let mut budget_lines: Vec<BudgetLineWithActual> = state
            .budget_lines
            .values()
            .filter(|line| line.month_id == month_id)
            .filter_map(|line| {
                let category = state.categories.get(&line.category_id)?;

                Some(BudgetLineWithActual {
                    id: line.id,
                    month_id: line.month_id,
                    category_id: line.category_id,
                    category_name: category.name.to_string(),
                    category_color: category.color.to_string(),
                    label: line.label.clone(),
                    expected_amount: line.expected,
                    actual_amount: state
                        .actual_for(line.id)
                        .map_or(Decimal::ZERO, |actual| actual.actual),
                })
            })
            .collect();
        budget_lines.sort_by(|a, b| {
            a.category_name
                .cmp(&b.category_name)
                .then_with(|| a.label.cmp(&b.label))
                .then(a.id.cmp(&b.id))
        });

        Ok(BoardData {
            month_id,
            year: month.year,
            month_name: month.name().to_owned(),
            is_finalized: month.finalized,
            budget_lines,
        })
    }

    fn can_finalize_month(&self, month_id: MonthId) -> Result<FinalizeEligibility, Error> {
        let state = self.lock()?;

        let zero_actual_count = state
            .budget_lines
            .values()
            .filter(|line| line.month_id == month_id)
            .filter_map(|line| state.actual_for(line.id))
            .filter(|actual| actual.actual.is_zero())
            .count() as i64;

        if zero_actual_count > 0 {
            Ok(FinalizeEligibility::zero_actuals(zero_actual_count))
        } else {
            Ok(FinalizeEligibility::eligible())
        }
    }

    fn finalize_month(&self, month_id: MonthId, snapshot_json: &str) -> Result<MonthId, Error> {
        self.transaction(|state| {
            let Some(current_month) = state.months.get_mut(&month_id) else {
                return Err(Error::NotFound
                    .context(format!("create annual snapshot for month {month_id}")));
            };
            current_month.finalized = true;
            let (next_year, next_month) =
                next_calendar_month(current_month.year, current_month.month);

            let snapshot_id = state.next_id();
            state.snapshots.insert(
                snapshot_id,
                AnnualSnap {
                    id: snapshot_id,
                    month_id,
                    snap_json: snapshot_json.to_owned(),
                    created_at: OffsetDateTime::now_utc(),
                },
            );

            let new_month = state.insert_month(next_year, next_month).map_err(|error| {
                error.context(format!(
                    "create next month record for {next_year}-{next_month:02}"
                ))
            })?;

            let templates: Vec<BudgetLine> = state
                .budget_lines
                .values()
                .filter(|line| line.month_id == month_id)
                .cloned()
                .collect();
            for template in &templates {
                state.insert_budget_line(
                    new_month.id,
                    template.category_id,
                    template.label.clone(),
                    template.expected,
                );
            }

            tracing::info!(
                "Finalized month {month_id}, created month {} ({next_year}-{next_month:02}) with {} budget lines",
                new_month.id,
                templates.len()
            );

            Ok(new_month.id)
        })
    }

    fn get_annual_snapshots_metadata_by_year(
        &self,
        year: i32,
    ) -> Result<Vec<AnnualSnapMeta>, Error> {
        let state = self.lock()?;

        let mut snapshots: Vec<(u8, AnnualSnapMeta)> = state
            .snapshots
            .values()
            .filter_map(|snapshot| {
                let month = state.months.get(&snapshot.month_id)?;
                (month.year == year).then(|| {
                    (
                        month.month,
                        AnnualSnapMeta {
                            id: snapshot.id,
                            month_id: snapshot.month_id,
                            year: month.year,
                            month_name: month.name().to_owned(),
                            created_at: snapshot.created_at,
                        },
                    )
                })
            })
            .collect();
        snapshots.sort_by_key(|(month, meta)| (*month, meta.id));

        Ok(snapshots.into_iter().map(|(_, meta)| meta).collect())
    }

    fn get_annual_snapshot_json_by_id(&self, snapshot_id: AnnualSnapId) -> Result<String, Error> {
        self.lock()?
            .snapshots
            .get(&snapshot_id)
            .map(|snapshot| snapshot.snap_json.clone())
            .ok_or(Error::NotFound)
    }
}
