//! `canned`: named operations run on this host.

use acsoap::{LocalExecutor, ProtocolRequest, ServerStatus, count_online_players};

use super::CommandContext;
use crate::cli::{CannedAction, CannedArgs};
use crate::error::Result;
use crate::output::{ResultBuilder, print_result};

pub async fn run(ctx: &CommandContext, args: CannedArgs) -> Result<()> {
	match args.action {
		CannedAction::CountOnlinePlayers(credentials) => {
			let builder = ResultBuilder::<ServerStatus>::new("canned count-online-players");
			let executor = LocalExecutor::new(ctx.defaults.clone())?;
			let mut request = ProtocolRequest::new(".server info");
			request.set_default(credentials.username.as_deref(), credentials.password.as_deref());
			let status = count_online_players(&executor, request).await;
			print_result(&builder.data(status).build(), ctx.format);
		}
	}
	Ok(())
}
