// Order table CSV parsing
use crate::model::{OrderRecord, ParseError};
use crate::utils::parse_order_date;
use csv::{ReaderBuilder, StringRecord, Trim};

pub const COL_CUSTOMER_ID: &str = "Customer_ID";
pub const COL_ORDER_ID: &str = "Order_ID";
pub const COL_DATE: &str = "Date";
pub const COL_REVENUE: &str = "Total_Revenue";
pub const COL_REGION: &str = "Region";

pub trait Parser {
    fn parse(&self, raw: &str) -> Result<Vec<OrderRecord>, ParseError>;
}

/// Column positions resolved from the header row.
struct Columns {
    customer_id: usize,
    order_id: usize,
    date: usize,
    revenue: usize,
    region: usize,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, ParseError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}') == name)
                .ok_or(ParseError::MissingColumn(name))
        };

        Ok(Self {
            customer_id: find(COL_CUSTOMER_ID)?,
            order_id: find(COL_ORDER_ID)?,
            date: find(COL_DATE)?,
            revenue: find(COL_REVENUE)?,
            region: find(COL_REGION)?,
        })
    }
}

pub struct OrdersCsvParser;

impl OrdersCsvParser {
    pub fn new() -> Self {
        Self
    }

    fn parse_row(row: &StringRecord, cols: &Columns, line: u64) -> Result<OrderRecord, ParseError> {
        let malformed = |reason: String| ParseError::MalformedRecord { line, reason };

        let field = |idx: usize, name: &str| -> Result<String, ParseError> {
            match row.get(idx) {
                Some(v) if !v.is_empty() => Ok(v.to_string()),
                _ => Err(malformed(format!("missing {}", name))),
            }
        };

        let customer_id = field(cols.customer_id, COL_CUSTOMER_ID)?;
        let order_id = field(cols.order_id, COL_ORDER_ID)?;
        let region = field(cols.region, COL_REGION)?;

        let raw_date = field(cols.date, COL_DATE)?;
        let date = parse_order_date(&raw_date)
            .ok_or_else(|| malformed(format!("unparseable {} {:?}", COL_DATE, raw_date)))?;

        let raw_revenue = field(cols.revenue, COL_REVENUE)?;
        let revenue = raw_revenue
            .parse::<f64>()
            .map_err(|_| malformed(format!("unparseable {} {:?}", COL_REVENUE, raw_revenue)))?;
        if !revenue.is_finite() || revenue < 0.0 {
            return Err(malformed(format!("negative or non-finite {} {}", COL_REVENUE, revenue)));
        }

        Ok(OrderRecord {
            customer_id,
            order_id,
            date,
            revenue,
            region,
        })
    }
}

impl Default for OrdersCsvParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for OrdersCsvParser {
    fn parse(&self, raw: &str) -> Result<Vec<OrderRecord>, ParseError> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(raw.as_bytes());

        let cols = Columns::resolve(reader.headers()?)?;

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            if row.iter().all(|v| v.is_empty()) {
                continue;
            }
            // File line where the record starts, header included.
            let line = row.position().map(|p| p.line()).unwrap_or_default();
            records.push(Self::parse_row(&row, &cols, line)?);
        }

        Ok(records)
    }
}
