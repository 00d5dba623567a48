//! Help output styling.

use clap::builder::Styles;
use clap::builder::styling::AnsiColor;

/// Gold section headers, cyan flags and GM command placeholders.
///
/// Parse errors use the same bold red as the `Error [CODE]` line on stderr.
pub fn cli_styles() -> Styles {
	let gold = AnsiColor::Yellow.on_default().bold();
	let red = AnsiColor::Red.on_default().bold();
	Styles::styled()
		.header(gold)
		.usage(gold)
		.literal(AnsiColor::Cyan.on_default().bold())
		.placeholder(AnsiColor::Cyan.on_default())
		.valid(AnsiColor::Green.on_default())
		.invalid(red)
		.error(red)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn errors_use_bold_red_under_gold_headers() {
		let styles = cli_styles();
		assert_eq!(*styles.get_error(), AnsiColor::Red.on_default().bold());
		assert_eq!(*styles.get_invalid(), AnsiColor::Red.on_default().bold());
		assert_eq!(*styles.get_header(), AnsiColor::Yellow.on_default().bold());
	}
}
