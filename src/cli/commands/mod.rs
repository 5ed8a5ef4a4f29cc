use clap::{
    Arg, ArgAction, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

/// Pure clap command definitions with zero business logic
#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new(env!("CARGO_PKG_NAME"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Increase verbosity, -vv for debug, -vvv for trace")
                .long("verbose")
                .short('v'),
        )
        .arg(
            Arg::new("format")
                .default_value("text")
                .env("MAILCERT_FORMAT")
                .global(true)
                .help("Output format: text or json")
                .long("format")
                .short('f')
                .value_name("FORMAT")
                .value_parser(["text", "json"]),
        )
        .subcommand(
            Command::new("validate")
                .about("Classify the certificate a mail server presents for <mailhost>")
                .arg(
                    Arg::new("mailhost")
                        .help("Host name the client is configured to reach")
                        .required(true),
                )
                .arg(
                    Arg::new("port-or-service")
                        .help("Port number or service name")
                        .long_help(
                            "Port number or one of the service names:\n\n\
                            - simap, imaps: 993\n\
                            - imap: 143\n\
                            - pops, pop3s, spop: 995\n\
                            - pop, pop3: 110\n\
                            - ssmtp, smtps: 465\n\
                            - smtp, submission: 587\n\
                            - lowsmtp: 25\n\n\
                            Note: the TLS handshake starts right after connecting, \
                            no STARTTLS negotiation is performed."
                        )
                        .required(true),
                )
                .arg(
                    Arg::new("timeout")
                        .default_value("10")
                        .env("MAILCERT_TIMEOUT")
                        .help("Seconds to wait for connect plus handshake, 0 waits forever")
                        .long("timeout")
                        .short('t')
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("ca")
                        .env("MAILCERT_CA")
                        .help("PEM file with extra trust anchors")
                        .long("ca")
                        .long_help(
                            "PEM file with extra Certificate Authority certificates.\n\
                            They are trusted in addition to the bundled WebPKI roots,\n\
                            useful to audit servers signed by a private CA.\n\n\
                            Example: /etc/ssl/private-ca.pem"
                        )
                        .value_name("PATH"),
                ),
        )
        .subcommand(
            Command::new("mx")
                .about("List the MX exchanges of <domain> and the root domains they live under")
                .arg(Arg::new("domain").help("Mail domain").required(true)),
        )
        .subcommand(
            Command::new("reverse")
                .about("Resolve <domain>, its CNAMEs, and the reverse names of its addresses")
                .arg(Arg::new("domain").help("Host name").required(true)),
        )
}
