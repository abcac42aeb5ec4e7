use std::collections::{BTreeMap, HashMap};

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use rayon::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowKey {
    pub team: String,
    pub opponent: String,
    pub season_year: i32,
    /// 0 for playoff rounds.
    pub week_num: u32,
    pub playoff: bool,
    pub game_date: NaiveDate,
    pub game_id: String,
    pub team_season_key: String,
}

impl RowKey {
    fn timeline_order(&self) -> (bool, u32, NaiveDate) {
        (self.playoff, self.week_num, self.game_date)
    }
}

pub type Column = Vec<Option<f64>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameFrame {
    keys: Vec<RowKey>,
    names: Vec<String>,
    data: Vec<Column>,
    index: HashMap<String, usize>,
}

impl GameFrame {
    pub fn new(keys: Vec<RowKey>) -> Self {
        Self {
            keys,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[RowKey] {
        &self.keys
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.index.get(name).map(|&idx| self.data[idx].as_slice())
    }

    pub fn require(&self, name: &str) -> Result<&[Option<f64>]> {
        self.column(name)
            .ok_or_else(|| anyhow!("missing column '{name}'"))
    }

    pub fn value(&self, name: &str, row: usize) -> Option<f64> {
        self.column(name).and_then(|col| col.get(row).copied().flatten())
    }

    /// Adds or replaces a column. NaN values are stored as missing.
    pub fn set_column(&mut self, name: impl Into<String>, values: Column) -> Result<()> {
        let name = name.into();
        if values.len() != self.keys.len() {
            return Err(anyhow!(
                "column '{name}' has {} values for {} rows",
                values.len(),
                self.keys.len()
            ));
        }
        let values = values
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        match self.index.get(&name) {
            Some(&idx) => self.data[idx] = values,
            None => {
                self.index.insert(name.clone(), self.names.len());
                self.names.push(name);
                self.data.push(values);
            }
        }
        Ok(())
    }

    pub fn derive(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&GameFrame, usize) -> Option<f64>,
    ) -> Result<()> {
        let values = (0..self.len()).map(|row| f(self, row)).collect();
        self.set_column(name, values)
    }

    pub fn select_rows(&self, rows: &[usize]) -> GameFrame {
        GameFrame {
            keys: rows.iter().map(|&r| self.keys[r].clone()).collect(),
            names: self.names.clone(),
            data: self
                .data
                .iter()
                .map(|col| rows.iter().map(|&r| col[r]).collect())
                .collect(),
            index: self.index.clone(),
        }
    }

    pub fn filter_rows(&self, keep: impl Fn(&GameFrame, usize) -> bool) -> GameFrame {
        let rows = (0..self.len())
            .filter(|&row| keep(self, row))
            .collect::<Vec<_>>();
        self.select_rows(&rows)
    }

    /// Row indices grouped by team-season, each group in timeline order.
    /// Groups are returned sorted by key so results never depend on input order.
    pub fn team_season_timelines(&self) -> Vec<Vec<usize>> {
        let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (row, key) in self.keys.iter().enumerate() {
            groups.entry(key.team_season_key.as_str()).or_default().push(row);
        }
        groups
            .into_values()
            .map(|mut rows| {
                rows.sort_by(|&a, &b| {
                    self.keys[a]
                        .timeline_order()
                        .cmp(&self.keys[b].timeline_order())
                        .then(a.cmp(&b))
                });
                rows
            })
            .collect()
    }

    pub fn map_timelines<F>(
        &self,
        timelines: &[Vec<usize>],
        source: &[Option<f64>],
        f: F,
    ) -> Column
    where
        F: Fn(&[Option<f64>]) -> Column + Sync,
    {
        let parts = timelines
            .par_iter()
            .map(|rows| {
                let series = rows.iter().map(|&r| source[r]).collect::<Vec<_>>();
                f(&series)
            })
            .collect::<Vec<_>>();

        let mut out = vec![None; self.len()];
        for (rows, values) in timelines.iter().zip(parts) {
            for (&row, value) in rows.iter().zip(values) {
                out[row] = value;
            }
        }
        out
    }
}
