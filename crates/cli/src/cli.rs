use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;

use supplier_auth::{Caller, Role, UserPatch};
use supplier_catalog::ProductPatch;
use supplier_core::{OrderId, UserId};
use supplier_infra::workflow::{NewProductRequest, RegistrationRequest};
use supplier_observability::LogFormat;
use supplier_orders::LineRequest;

use crate::services::Services;

#[derive(Debug, Parser)]
#[command(name = "supplier", about = "Supplier backend operator CLI", long_about = None)]
pub struct Cli {
    /// Log output format (json or pretty)
    #[arg(long, global = true, env = "SUPPLIER_LOG_FORMAT", default_value = "json")]
    pub log_format: LogFormat,

    /// User id the command acts as (required by every command except
    /// register and login)
    #[arg(long, global = true, env = "SUPPLIER_AS_USER")]
    pub as_user: Option<i64>,

    /// Role the command acts with
    #[arg(long, global = true, env = "SUPPLIER_AS_ROLE", default_value = "user")]
    pub as_role: String,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn caller(&self) -> Option<Caller> {
        self.as_user
            .map(|id| Caller::new(UserId::new(id), Role::new(self.as_role.clone())))
    }

    fn is_anonymous(&self) -> bool {
        matches!(self.command, Commands::Register(_) | Commands::Login(_))
    }
}

const CALLER_REQUIRED: &str = "--as-user (or SUPPLIER_AS_USER) is required for this command";

#[derive(Debug, Subcommand)]
enum Commands {
    /// Invite code administration
    Invite(InviteCommand),
    /// Catalog administration
    Product(ProductCommand),
    /// Order placement and management
    Order(OrderCommand),
    /// User administration
    User(UserCommand),
    /// Register a new user with an invite code
    Register(RegisterArgs),
    /// Check credentials and print the claims to sign
    Login(LoginArgs),
}

#[derive(Debug, Args)]
struct InviteCommand {
    #[command(subcommand)]
    command: InviteSubcommand,
}

#[derive(Debug, Subcommand)]
enum InviteSubcommand {
    Generate,
    List,
}

#[derive(Debug, Args)]
struct ProductCommand {
    #[command(subcommand)]
    command: ProductSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductSubcommand {
    Add {
        #[arg(long)]
        sku: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        price: Decimal,
        #[arg(long, default_value_t = 0)]
        stock: i64,
    },
    List,
    Show {
        #[arg(long)]
        sku: String,
    },
    Patch {
        #[arg(long)]
        sku: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        price: Option<Decimal>,
        /// New absolute stock level
        #[arg(long)]
        stock: Option<i64>,
    },
    Delete {
        #[arg(long)]
        sku: String,
    },
}

#[derive(Debug, Args)]
struct OrderCommand {
    #[command(subcommand)]
    command: OrderSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrderSubcommand {
    /// Place an order owned by the acting user
    Place {
        /// Line item as SKU=QUANTITY (repeatable)
        #[arg(long = "item", value_parser = parse_line, required = true)]
        items: Vec<LineRequest>,
    },
    List,
    Show {
        #[arg(long)]
        id: i64,
    },
    Update {
        #[arg(long)]
        id: i64,
        /// Replacement line item as SKU=QUANTITY (repeatable)
        #[arg(long = "item", value_parser = parse_line, required = true)]
        items: Vec<LineRequest>,
    },
    Delete {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Debug, Args)]
struct UserCommand {
    #[command(subcommand)]
    command: UserSubcommand,
}

#[derive(Debug, Subcommand)]
enum UserSubcommand {
    List,
    Patch {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
    /// Change the acting user's password
    Password {
        #[arg(long, env = "SUPPLIER_NEW_PASSWORD", hide_env_values = true)]
        new_password: String,
    },
    Delete {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Debug, Args)]
struct RegisterArgs {
    #[arg(long)]
    username: String,
    #[arg(long, env = "SUPPLIER_PASSWORD", hide_env_values = true)]
    password: String,
    #[arg(long)]
    address: String,
    #[arg(long)]
    invite: String,
}

#[derive(Debug, Args)]
struct LoginArgs {
    #[arg(long)]
    username: String,
    #[arg(long, env = "SUPPLIER_PASSWORD", hide_env_values = true)]
    password: String,
}

fn parse_line(raw: &str) -> Result<LineRequest, String> {
    let (sku, qty) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected SKU=QUANTITY, got '{raw}'"))?;
    let quantity = qty
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid quantity in '{raw}': {e}"))?;
    Ok(LineRequest::new(sku.trim(), quantity))
}

fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("failed to render output")?
    );
    Ok(())
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let caller = cli.caller();
    if caller.is_none() && !cli.is_anonymous() {
        bail!(CALLER_REQUIRED);
    }
    let services = Services::connect().await?;

    match (cli.command, caller) {
        (Commands::Invite(InviteCommand { command }), Some(caller)) => match command {
            InviteSubcommand::Generate => print(&services.invites.generate(&caller).await?),
            InviteSubcommand::List => print(&services.invites.list(&caller).await?),
        },

        (Commands::Product(ProductCommand { command }), Some(caller)) => match command {
            ProductSubcommand::Add {
                sku,
                name,
                price,
                stock,
            } => {
                let request = NewProductRequest {
                    sku,
                    name,
                    price,
                    stock_quantity: stock,
                };
                print(&services.catalog.create_product(&caller, &request).await?)
            }
            ProductSubcommand::List => print(&services.catalog.list_products().await?),
            ProductSubcommand::Show { sku } => print(&services.catalog.get_product(&sku).await?),
            ProductSubcommand::Patch {
                sku,
                name,
                price,
                stock,
            } => {
                let patch = ProductPatch {
                    name,
                    price,
                    stock_quantity: stock,
                };
                if patch.is_empty() {
                    bail!("nothing to change: pass --name, --price or --stock");
                }
                print(&services.catalog.patch_product(&caller, &sku, &patch).await?)
            }
            ProductSubcommand::Delete { sku } => {
                services.catalog.delete_product(&caller, &sku).await?;
                Ok(())
            }
        },

        (Commands::Order(OrderCommand { command }), Some(caller)) => match command {
            OrderSubcommand::Place { items } => {
                print(&services.orders.place_order(caller.user_id(), &items).await?)
            }
            OrderSubcommand::List => print(&services.orders.list_orders(&caller).await?),
            OrderSubcommand::Show { id } => {
                print(&services.orders.get_order(OrderId::new(id), &caller).await?)
            }
            OrderSubcommand::Update { id, items } => print(
                &services
                    .orders
                    .update_order(OrderId::new(id), &caller, &items)
                    .await?,
            ),
            OrderSubcommand::Delete { id } => {
                services.orders.delete_order(OrderId::new(id), &caller).await?;
                Ok(())
            }
        },

        (Commands::User(UserCommand { command }), Some(caller)) => match command {
            UserSubcommand::List => print(&services.users.list_users(&caller).await?),
            UserSubcommand::Patch { id, role, address } => {
                let patch = UserPatch {
                    role: role.map(Role::new),
                    address,
                };
                if patch.is_empty() {
                    bail!("nothing to change: pass --role or --address");
                }
                print(&services.users.patch_user(&caller, UserId::new(id), &patch).await?)
            }
            UserSubcommand::Password { new_password } => {
                services.users.change_password(&caller, &new_password).await?;
                Ok(())
            }
            UserSubcommand::Delete { id } => {
                services.users.delete_user(&caller, UserId::new(id)).await?;
                Ok(())
            }
        },

        (Commands::Register(args), _) => {
            let request = RegistrationRequest {
                username: args.username,
                password: args.password,
                address: args.address,
                invite_code: args.invite,
            };
            print(&services.registration.register(&request).await?)
        }

        (Commands::Login(args), _) => print(&services.login.login(&args.username, &args.password).await?),

        (_, None) => bail!(CALLER_REQUIRED),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_line_items() {
        assert_eq!(parse_line("MLK001=7"), Ok(LineRequest::new("MLK001", 7)));
        assert_eq!(parse_line(" EGG012 = 2 "), Ok(LineRequest::new("EGG012", 2)));
        assert!(parse_line("MLK001").is_err());
        assert!(parse_line("MLK001=lots").is_err());
    }

    #[test]
    fn order_place_collects_repeated_items() {
        let cli = Cli::try_parse_from([
            "supplier",
            "--as-user",
            "7",
            "--as-role",
            "user",
            "order",
            "place",
            "--item",
            "MLK001=7",
            "--item",
            "EGG012=1",
        ])
        .unwrap();

        assert_eq!(cli.caller(), Some(Caller::new(UserId::new(7), Role::USER)));
        let Commands::Order(OrderCommand {
            command: OrderSubcommand::Place { items },
        }) = cli.command
        else {
            panic!("expected order place");
        };
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn caller_defaults_to_the_user_role() {
        let cli = Cli::try_parse_from(["supplier", "--as-user", "7", "product", "list"]).unwrap();
        let caller = cli.caller().unwrap();
        assert_eq!(caller.role(), &Role::USER);
        assert!(!caller.is_admin());
    }

    #[test]
    fn only_register_and_login_run_without_a_caller() {
        let login = Cli::try_parse_from(["supplier", "login", "--username", "a", "--password", "b"]).unwrap();
        assert!(login.is_anonymous());

        let list = Cli::try_parse_from(["supplier", "invite", "list"]).unwrap();
        assert!(!list.is_anonymous());
        assert_eq!(list.caller(), None);
    }

    #[tokio::test]
    async fn missing_caller_is_refused_before_connecting() {
        let cli = Cli::try_parse_from(["supplier", "--as-role", "admin", "invite", "generate"]).unwrap();
        let err = run(cli).await.unwrap_err();
        assert_eq!(err.to_string(), CALLER_REQUIRED);
    }
}
