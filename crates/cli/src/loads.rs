use crate::render;
use clap::Args;
use freightdash_core::client::DashboardSource;
use freightdash_core::domain::load::{LoadQuery, NewLoad};

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Case-insensitive substring of the origin.
    #[arg(long)]
    origin: Option<String>,

    /// Case-insensitive substring of the destination.
    #[arg(long)]
    destination: Option<String>,

    #[arg(long)]
    equipment: Option<String>,

    #[arg(long)]
    min_rate: Option<u32>,

    #[arg(long)]
    max_rate: Option<u32>,

    #[arg(long, default_value_t = 10)]
    limit: u32,

    /// Print raw JSON instead of a table.
    #[arg(long)]
    json: bool,
}

impl From<SearchArgs> for LoadQuery {
    fn from(args: SearchArgs) -> Self {
        Self {
            origin: args.origin,
            destination: args.destination,
            equipment: args.equipment,
            min_rate: args.min_rate,
            max_rate: args.max_rate,
            limit: args.limit,
        }
    }
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    #[arg(long)]
    load_id: String,
    #[arg(long)]
    origin: String,
    #[arg(long)]
    destination: String,
    /// ISO-8601, e.g. 2024-01-01T08:00.
    #[arg(long)]
    pickup: String,
    /// ISO-8601, e.g. 2024-01-02T17:00.
    #[arg(long)]
    delivery: String,
    #[arg(long)]
    equipment_type: String,
    #[arg(long)]
    rate: u32,
    #[arg(long)]
    miles: Option<u32>,
    #[arg(long)]
    weight: Option<u32>,
    #[arg(long)]
    commodity_type: Option<String>,
    #[arg(long)]
    notes: Option<String>,
}

impl From<CreateArgs> for NewLoad {
    fn from(args: CreateArgs) -> Self {
        Self {
            load_id: args.load_id,
            origin: args.origin,
            destination: args.destination,
            pickup_datetime: args.pickup,
            delivery_datetime: args.delivery,
            equipment_type: args.equipment_type,
            loadboard_rate: args.rate,
            miles: args.miles,
            notes: args.notes,
            weight: args.weight,
            commodity_type: args.commodity_type,
        }
    }
}

pub async fn search(source: &dyn DashboardSource, args: SearchArgs) -> anyhow::Result<()> {
    let json = args.json;
    let query = LoadQuery::from(args);
    let loads = source.fetch_loads(&query).await?;
    tracing::info!(count = loads.len(), "load search complete");

    if json {
        println!("{}", serde_json::to_string_pretty(&loads)?);
    } else {
        print!("{}", render::render_load_table(&loads));
    }
    Ok(())
}

pub async fn get(source: &dyn DashboardSource, load_id: &str) -> anyhow::Result<()> {
    match source.fetch_load(load_id).await? {
        Some(load) => println!("{}", serde_json::to_string_pretty(&load)?),
        None => anyhow::bail!("load not found: {load_id}"),
    }
    Ok(())
}

pub async fn create(source: &dyn DashboardSource, args: CreateArgs) -> anyhow::Result<()> {
    let created = source.create_load(NewLoad::from(args)).await?;
    tracing::info!(load_id = %created.load_id, "load registered");
    println!("{}", serde_json::to_string_pretty(&created)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(flatten)]
        create: CreateArgs,
    }

    #[test]
    fn create_args_map_onto_new_load() {
        let harness = Harness::parse_from([
            "freightdash",
            "--load-id",
            "L-9",
            "--origin",
            "Reno, NV",
            "--destination",
            "Boise, ID",
            "--pickup",
            "2024-03-01T07:00",
            "--delivery",
            "2024-03-01T19:00",
            "--equipment-type",
            "Flatbed",
            "--rate",
            "2100",
            "--miles",
            "420",
        ]);
        let load = NewLoad::from(harness.create);
        assert_eq!(load.load_id, "L-9");
        assert_eq!(load.loadboard_rate, 2100);
        assert_eq!(load.miles, Some(420));
        assert_eq!(load.weight, None);
        assert!(load.validate().is_ok());
    }
}
