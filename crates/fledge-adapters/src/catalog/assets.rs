//! File bodies for the built-in bundles.
//!
//! Static bodies use `{{VAR}}` placeholders resolved by
//! [`RenderContext::render`](fledge_core::domain::RenderContext::render).
//! Bodies that depend on the configuration shape are assembled by the
//! functions below before placeholder substitution.

use fledge_core::domain::{FeatureFlags, Platform, StateManagement};

// ── Project files ─────────────────────────────────────────────────────────────

pub const GITIGNORE: &str = "\
.dart_tool/
.packages
build/
.flutter-plugins
.flutter-plugins-dependencies
.idea/
*.iml
.env
";

pub const ANALYSIS_OPTIONS: &str = "\
include: package:flutter_lints/flutter.yaml

linter:
  rules:
    prefer_const_constructors: true
    avoid_print: true
";

pub fn pubspec(state: StateManagement, features: FeatureFlags) -> String {
    let mut out = String::from(
        "name: {{APP_NAME_SNAKE}}\n\
         description: {{APP_NAME}}, generated by fledge.\n\
         publish_to: \"none\"\n\
         version: 0.1.0+1\n\
         \n\
         environment:\n  sdk: \">=3.3.0 <4.0.0\"\n\
         \n\
         dependencies:\n  flutter:\n    sdk: flutter\n",
    );
    out.push_str(match state {
        StateManagement::Provider => "  provider: ^6.1.2\n",
        StateManagement::Riverpod => "  flutter_riverpod: ^2.5.1\n",
        StateManagement::Bloc => "  flutter_bloc: ^8.1.6\n",
        StateManagement::GetX => "  get: ^4.6.6\n",
    });
    if features.localization {
        out.push_str("  flutter_localizations:\n    sdk: flutter\n  intl: any\n");
    }
    if features.env {
        out.push_str("  flutter_dotenv: ^5.1.0\n");
    }
    if features.api_client {
        out.push_str("  http: ^1.2.2\n");
    }

    out.push_str("\ndev_dependencies:\n  flutter_test:\n    sdk: flutter\n  flutter_lints: ^4.0.0\n");
    if features.tests && state == StateManagement::Bloc {
        out.push_str("  bloc_test: ^9.1.7\n");
    }

    out.push_str("\nflutter:\n  uses-material-design: true\n");
    if features.localization {
        out.push_str("  generate: true\n");
    }
    if features.env {
        out.push_str("  assets:\n    - .env\n");
    }
    out
}

pub fn readme(features: FeatureFlags) -> String {
    let mut out = String::from(
        "# {{APP_NAME}}\n\
         \n\
         Platforms: {{PLATFORMS}}\n\
         State management: {{STATE_MANAGEMENT}}\n",
    );
    let enabled = features.enabled();
    if !enabled.is_empty() {
        out.push_str("Features: ");
        out.push_str(&enabled.join(", "));
        out.push('\n');
    }
    out.push_str("\n## Getting started\n\n```sh\nflutter pub get\nflutter run\n```\n");
    out
}

// ── Application shell ─────────────────────────────────────────────────────────

pub fn main_dart(state: StateManagement, features: FeatureFlags) -> String {
    let mut out = String::from("import 'package:flutter/material.dart';\n");
    match state {
        StateManagement::Provider => out.push_str(
            "import 'package:provider/provider.dart';\n\nimport 'app.dart';\nimport 'state/counter.dart';\n",
        ),
        StateManagement::Riverpod => out.push_str(
            "import 'package:flutter_riverpod/flutter_riverpod.dart';\n\nimport 'app.dart';\n",
        ),
        StateManagement::Bloc | StateManagement::GetX => out.push_str("\nimport 'app.dart';\n"),
    }
    if features.env {
        out.push_str("import 'package:flutter_dotenv/flutter_dotenv.dart';\n");
    }

    out.push_str(if features.env {
        "\nFuture<void> main() async {\n  WidgetsFlutterBinding.ensureInitialized();\n  await dotenv.load();\n"
    } else {
        "\nvoid main() {\n"
    });
    out.push_str(match state {
        StateManagement::Provider => {
            "  runApp(\n    ChangeNotifierProvider(\n      create: (_) => Counter(),\n      child: const {{APP_NAME_PASCAL}}App(),\n    ),\n  );\n"
        }
        StateManagement::Riverpod => "  runApp(const ProviderScope(child: {{APP_NAME_PASCAL}}App()));\n",
        StateManagement::Bloc | StateManagement::GetX => "  runApp(const {{APP_NAME_PASCAL}}App());\n",
    });
    out.push_str("}\n");
    out
}

pub fn app_dart(state: StateManagement, features: FeatureFlags) -> String {
    let mut out = String::from("import 'package:flutter/material.dart';\n");
    if state == StateManagement::GetX {
        out.push_str("import 'package:get/get.dart';\n");
    }
    if features.localization {
        out.push_str("import 'package:flutter_gen/gen_l10n/app_localizations.dart';\n");
    }
    out.push('\n');
    out.push_str("import 'screens/home_screen.dart';\n");
    if features.theme {
        out.push_str("import 'theme/app_theme.dart';\n");
    }

    let widget = if state == StateManagement::GetX {
        "GetMaterialApp"
    } else {
        "MaterialApp"
    };
    out.push_str(
        "\nclass {{APP_NAME_PASCAL}}App extends StatelessWidget {\n  const {{APP_NAME_PASCAL}}App({super.key});\n\n  @override\n  Widget build(BuildContext context) {\n    return ",
    );
    out.push_str(widget);
    out.push_str("(\n      title: '{{APP_NAME}}',\n");
    if features.theme {
        out.push_str("      theme: AppTheme.light,\n      darkTheme: AppTheme.dark,\n");
    }
    if features.localization {
        out.push_str(
            "      localizationsDelegates: AppLocalizations.localizationsDelegates,\n      supportedLocales: AppLocalizations.supportedLocales,\n",
        );
    }
    out.push_str("      home: const HomeScreen(),\n    );\n  }\n}\n");
    out
}

/// Relative path and body of the counter state for `state`.
pub fn state_file(state: StateManagement) -> (&'static str, &'static str) {
    match state {
        StateManagement::Provider => ("lib/state/counter.dart", PROVIDER_STATE),
        StateManagement::Riverpod => ("lib/state/counter_provider.dart", RIVERPOD_STATE),
        StateManagement::Bloc => ("lib/state/counter_cubit.dart", BLOC_STATE),
        StateManagement::GetX => ("lib/state/counter_controller.dart", GETX_STATE),
    }
}

const PROVIDER_STATE: &str = "\
import 'package:flutter/foundation.dart';

class Counter extends ChangeNotifier {
  int _value = 0;

  int get value => _value;

  void increment() {
    _value++;
    notifyListeners();
  }
}
";

const RIVERPOD_STATE: &str = "\
import 'package:flutter_riverpod/flutter_riverpod.dart';

class Counter extends Notifier<int> {
  @override
  int build() => 0;

  void increment() => state++;
}

final counterProvider = NotifierProvider<Counter, int>(Counter.new);
";

const BLOC_STATE: &str = "\
import 'package:flutter_bloc/flutter_bloc.dart';

class CounterCubit extends Cubit<int> {
  CounterCubit() : super(0);

  void increment() => emit(state + 1);
}
";

const GETX_STATE: &str = "\
import 'package:get/get.dart';

class CounterController extends GetxController {
  final value = 0.obs;

  void increment() => value.value++;
}
";

pub fn home_screen(state: StateManagement) -> &'static str {
    match state {
        StateManagement::Provider => PROVIDER_HOME,
        StateManagement::Riverpod => RIVERPOD_HOME,
        StateManagement::Bloc => BLOC_HOME,
        StateManagement::GetX => GETX_HOME,
    }
}

const PROVIDER_HOME: &str = "\
import 'package:flutter/material.dart';
import 'package:provider/provider.dart';

import '../state/counter.dart';

class HomeScreen extends StatelessWidget {
  const HomeScreen({super.key});

  @override
  Widget build(BuildContext context) {
    final counter = context.watch<Counter>();
    return Scaffold(
      appBar: AppBar(title: const Text('{{APP_NAME}}')),
      body: Center(child: Text('${counter.value}')),
      floatingActionButton: FloatingActionButton(
        onPressed: counter.increment,
        child: const Icon(Icons.add),
      ),
    );
  }
}
";

const RIVERPOD_HOME: &str = "\
import 'package:flutter/material.dart';
import 'package:flutter_riverpod/flutter_riverpod.dart';

import '../state/counter_provider.dart';

class HomeScreen extends ConsumerWidget {
  const HomeScreen({super.key});

  @override
  Widget build(BuildContext context, WidgetRef ref) {
    final count = ref.watch(counterProvider);
    return Scaffold(
      appBar: AppBar(title: const Text('{{APP_NAME}}')),
      body: Center(child: Text('$count')),
      floatingActionButton: FloatingActionButton(
        onPressed: () => ref.read(counterProvider.notifier).increment(),
        child: const Icon(Icons.add),
      ),
    );
  }
}
";

const BLOC_HOME: &str = "\
import 'package:flutter/material.dart';
import 'package:flutter_bloc/flutter_bloc.dart';

import '../state/counter_cubit.dart';

class HomeScreen extends StatelessWidget {
  const HomeScreen({super.key});

  @override
  Widget build(BuildContext context) {
    return BlocProvider(
      create: (_) => CounterCubit(),
      child: Builder(
        builder: (context) => Scaffold(
          appBar: AppBar(title: const Text('{{APP_NAME}}')),
          body: Center(
            child: BlocBuilder<CounterCubit, int>(
              builder: (context, count) => Text('$count'),
            ),
          ),
          floatingActionButton: FloatingActionButton(
            onPressed: () => context.read<CounterCubit>().increment(),
            child: const Icon(Icons.add),
          ),
        ),
      ),
    );
  }
}
";

const GETX_HOME: &str = "\
import 'package:flutter/material.dart';
import 'package:get/get.dart';

import '../state/counter_controller.dart';

class HomeScreen extends StatelessWidget {
  const HomeScreen({super.key});

  @override
  Widget build(BuildContext context) {
    final counter = Get.put(CounterController());
    return Scaffold(
      appBar: AppBar(title: const Text('{{APP_NAME}}')),
      body: Center(child: Obx(() => Text('${counter.value}'))),
      floatingActionButton: FloatingActionButton(
        onPressed: counter.increment,
        child: const Icon(Icons.add),
      ),
    );
  }
}
";

pub const ADAPTIVE_LAYOUT: &str = "\
import 'package:flutter/widgets.dart';

/// Targets: {{PLATFORMS}}.
class AdaptiveLayout extends StatelessWidget {
  const AdaptiveLayout({super.key, required this.compact, required this.wide});

  final Widget compact;
  final Widget wide;

  @override
  Widget build(BuildContext context) {
    final width = MediaQuery.sizeOf(context).width;
    return width < 720 ? compact : wide;
  }
}
";

// ── Platform runners ──────────────────────────────────────────────────────────

/// Runner files for `platform`, as (relative path, body) pairs.
pub fn platform_files(platform: Platform) -> &'static [(&'static str, &'static str)] {
    match platform {
        Platform::Mobile => &[
            ("android/app/src/main/AndroidManifest.xml", ANDROID_MANIFEST),
            ("ios/Runner/Info.plist", IOS_INFO_PLIST),
        ],
        Platform::Web => &[("web/index.html", WEB_INDEX), ("web/manifest.json", WEB_MANIFEST)],
        Platform::Desktop => &[
            ("linux/CMakeLists.txt", LINUX_CMAKE),
            ("macos/Runner/Configs/AppInfo.xcconfig", MACOS_APP_INFO),
            ("windows/CMakeLists.txt", WINDOWS_CMAKE),
        ],
    }
}

const ANDROID_MANIFEST: &str = "\
<manifest xmlns:android=\"http://schemas.android.com/apk/res/android\">
    <application android:label=\"{{APP_NAME}}\" android:icon=\"@mipmap/ic_launcher\">
        <activity android:name=\".MainActivity\" android:exported=\"true\" />
    </application>
</manifest>
";

const IOS_INFO_PLIST: &str = "\
<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<plist version=\"1.0\">
<dict>
    <key>CFBundleName</key>
    <string>{{APP_NAME}}</string>
    <key>CFBundleDisplayName</key>
    <string>{{APP_NAME_PASCAL}}</string>
</dict>
</plist>
";

const WEB_INDEX: &str = "\
<!DOCTYPE html>
<html>
<head>
  <meta charset=\"UTF-8\">
  <title>{{APP_NAME}}</title>
  <link rel=\"manifest\" href=\"manifest.json\">
</head>
<body>
  <script src=\"flutter_bootstrap.js\" async></script>
</body>
</html>
";

const WEB_MANIFEST: &str = "\
{
  \"name\": \"{{APP_NAME}}\",
  \"short_name\": \"{{APP_NAME_PASCAL}}\",
  \"start_url\": \".\",
  \"display\": \"standalone\"
}
";

const LINUX_CMAKE: &str = "\
cmake_minimum_required(VERSION 3.13)
project(runner LANGUAGES CXX)
set(BINARY_NAME \"{{APP_NAME_SNAKE}}\")
set(APPLICATION_ID \"dev.fledge.{{APP_NAME_SNAKE}}\")
";

const MACOS_APP_INFO: &str = "\
PRODUCT_NAME = {{APP_NAME_PASCAL}}
PRODUCT_BUNDLE_IDENTIFIER = dev.fledge.{{APP_NAME_SNAKE}}
";

const WINDOWS_CMAKE: &str = "\
cmake_minimum_required(VERSION 3.14)
project({{APP_NAME_SNAKE}} LANGUAGES CXX)
set(BINARY_NAME \"{{APP_NAME_SNAKE}}\")
";

// ── Feature files ─────────────────────────────────────────────────────────────

pub const APP_THEME: &str = "\
import 'package:flutter/material.dart';

abstract final class AppTheme {
  static final light = ThemeData(
    colorSchemeSeed: Colors.indigo,
    brightness: Brightness.light,
    useMaterial3: true,
  );

  static final dark = ThemeData(
    colorSchemeSeed: Colors.indigo,
    brightness: Brightness.dark,
    useMaterial3: true,
  );
}
";

pub const L10N_CONFIG: &str = "\
arb-dir: lib/l10n
template-arb-file: app_en.arb
output-localization-file: app_localizations.dart
";

pub const L10N_EN: &str = "\
{
  \"@@locale\": \"en\",
  \"appTitle\": \"{{APP_NAME}}\"
}
";

pub const ENV: &str = "\
APP_NAME={{APP_NAME}}
API_BASE_URL=http://localhost:8080
";

pub const ENV_EXAMPLE: &str = "\
APP_NAME=
API_BASE_URL=
";

pub const API_CLIENT: &str = "\
import 'dart:convert';

import 'package:http/http.dart' as http;

class ApiClient {
  ApiClient({required this.baseUrl, http.Client? client})
      : _client = client ?? http.Client();

  final String baseUrl;
  final http.Client _client;

  Future<Map<String, dynamic>> getJson(String path) async {
    final response = await _client.get(Uri.parse('$baseUrl$path'));
    if (response.statusCode != 200) {
      throw http.ClientException('GET $path failed: ${response.statusCode}');
    }
    return jsonDecode(response.body) as Map<String, dynamic>;
  }
}
";

pub const WIDGET_TEST: &str = "\
import 'package:flutter_test/flutter_test.dart';

import 'package:{{APP_NAME_SNAKE}}/app.dart';

void main() {
  testWidgets('shows the app title', (tester) async {
    await tester.pumpWidget(const {{APP_NAME_PASCAL}}App());
    expect(find.text('{{APP_NAME}}'), findsOneWidget);
  });
}
";
